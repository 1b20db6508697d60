//! One injectable entry point for callers.
//!
//! `RecoveryEngine` bundles the classifier, scheduler, breaker, planner,
//! and reporting rules behind the six operations callers need. It holds no
//! handle to the operations it judges and never sleeps, retries, or reports
//! on its own.

use std::sync::Arc;

use crate::breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerDecision};
use crate::classify::{self, ErrorClassification, ErrorCode, ErrorType};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::context::ErrorContext;
use crate::plan::{self, RecoveryStrategy};
use crate::report::{self, ErrorReportDecision, ReportSampler};
use crate::retry::{RetrySchedule, RetryScheduler};

#[derive(Debug)]
pub struct RecoveryEngine {
    scheduler: RetryScheduler,
    breaker: Arc<CircuitBreaker>,
    sampler: ReportSampler,
    breaker_config: CircuitBreakerConfig,
}

impl RecoveryEngine {
    /// Engine on the system clock.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let breaker = Arc::new(CircuitBreaker::with_retention(
            Arc::clone(&clock),
            config.ledger_retention_secs,
        ));
        Self::with_parts(
            RetryScheduler::from_config(clock, &config.retry()),
            breaker,
            ReportSampler::from_config(&config.reporting),
            config.circuit_breaker.clone(),
        )
    }

    /// Assemble from pre-built parts, e.g. a breaker shared with other engines.
    pub fn with_parts(
        scheduler: RetryScheduler,
        breaker: Arc<CircuitBreaker>,
        sampler: ReportSampler,
        breaker_config: CircuitBreakerConfig,
    ) -> Self {
        Self {
            scheduler,
            breaker,
            sampler,
            breaker_config,
        }
    }

    pub fn classify(
        &self,
        code: &str,
        message: Option<&str>,
        http_status: Option<u16>,
        context: &ErrorContext,
    ) -> ErrorClassification {
        classify::classify(code, message, http_status, context)
    }

    pub fn plan(
        &self,
        classification: &ErrorClassification,
        context: &ErrorContext,
    ) -> RecoveryStrategy {
        plan::plan(classification, context, &self.scheduler)
    }

    /// Schedule the next attempt of `operation`.
    ///
    /// Uses the type of the newest failure recorded for the operation; with
    /// nothing recorded, the default (`Unknown`) curve applies.
    pub fn schedule_retry(&self, operation: &str, attempt_number: u32) -> RetrySchedule {
        let error_type = self
            .breaker
            .last_error_for(operation)
            .map(|r| last_error_type(&r.error_code, r.message.as_deref()))
            .unwrap_or(ErrorType::Unknown);
        self.scheduler.schedule(error_type, attempt_number)
    }

    pub fn record_failure(&self, code: &str, operation: &str, message: Option<&str>) {
        self.breaker.record_error(code, operation, message);
    }

    pub fn should_trip(&self, config: &CircuitBreakerConfig) -> CircuitBreakerDecision {
        self.breaker.should_trip(config)
    }

    /// `should_trip` with the configured thresholds.
    pub fn should_trip_default(&self) -> CircuitBreakerDecision {
        self.breaker.should_trip(&self.breaker_config)
    }

    pub fn decide_report(
        &self,
        classification: &ErrorClassification,
        context: &ErrorContext,
    ) -> ErrorReportDecision {
        report::decide(classification, context)
    }

    /// Verdict plus sampling: whether to actually send this failure.
    pub fn admit_report(
        &self,
        classification: &ErrorClassification,
        context: &ErrorContext,
    ) -> bool {
        self.sampler.admit(&self.decide_report(classification, context))
    }

    pub fn scheduler(&self) -> &RetryScheduler {
        &self.scheduler
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    pub fn breaker_config(&self) -> &CircuitBreakerConfig {
        &self.breaker_config
    }
}

impl Default for RecoveryEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Ledger records carry no status, so only the code (and message) count.
fn last_error_type(code: &str, message: Option<&str>) -> ErrorType {
    let code = ErrorCode::parse(code);
    code.network_type()
        .or_else(|| code.error_type(message))
        .unwrap_or(ErrorType::Unknown)
}
