//! Sliding-window circuit breaker.
//!
//! Failures are appended to a shared ledger by `record_error`; trip decisions
//! are derived from it by `should_trip`. Recording and deciding are decoupled
//! so concurrent operations share one failure signal without each call site
//! tracking its own window.
//!
//! The breaker is instance-scoped: create one and hand it (usually behind an
//! `Arc`) to every caller that should share a failure signal. One mutex
//! guards both the ledger and the stored trip deadlines, so readers never see
//! a half-appended or half-pruned ledger.
//!
//! Once tripped, a scope stays Open until its `reset_at` even if the failures
//! age out of the window earlier.

mod decision;
mod ledger;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::clock::{add_ms, sub_ms, Clock, SystemClock};

pub use decision::{CircuitBreakerConfig, CircuitBreakerDecision, CircuitState};
pub use ledger::ErrorRecord;

use ledger::Ledger;

/// Records older than this are pruned on every insert.
pub const DEFAULT_RETENTION_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Scope {
    Global,
    Operation(String),
}

impl Scope {
    fn operation(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Operation(op) => Some(op),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    ledger: Ledger,
    tripped_until: HashMap<Scope, DateTime<Utc>>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    clock: Arc<dyn Clock>,
    retention_ms: u64,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_retention(clock, DEFAULT_RETENTION_SECS)
    }

    pub fn with_retention(clock: Arc<dyn Clock>, retention_secs: u64) -> Self {
        Self {
            clock,
            retention_ms: retention_secs.saturating_mul(1000),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Append a failure and prune everything past the retention horizon.
    pub fn record_error(&self, error_code: &str, operation: &str, message: Option<&str>) {
        let now = self.clock.now();
        let record = ErrorRecord {
            error_code: error_code.to_string(),
            operation: operation.to_string(),
            timestamp: now,
            message: message.map(str::to_string),
        };
        let mut inner = self.lock();
        inner.ledger.push(record);
        let pruned = inner.ledger.prune_before(sub_ms(now, self.retention_ms));
        if pruned > 0 {
            tracing::trace!(pruned, "pruned expired failure records");
        }
    }

    /// Decide over all recorded failures.
    pub fn should_trip(&self, config: &CircuitBreakerConfig) -> CircuitBreakerDecision {
        self.evaluate(Scope::Global, config)
    }

    /// Decide over the failures of one operation only.
    pub fn should_trip_for(
        &self,
        operation: &str,
        config: &CircuitBreakerConfig,
    ) -> CircuitBreakerDecision {
        self.evaluate(Scope::Operation(operation.to_string()), config)
    }

    fn evaluate(&self, scope: Scope, config: &CircuitBreakerConfig) -> CircuitBreakerDecision {
        let now = self.clock.now();
        let mut inner = self.lock();

        if let Some(until) = inner.tripped_until.get(&scope).copied() {
            if now < until {
                return CircuitBreakerDecision::open(
                    format!("circuit open until {}", until.to_rfc3339()),
                    config.trip_duration_ms,
                    until,
                );
            }
        }

        let cutoff = sub_ms(now, config.window_duration_ms);
        let count = inner.ledger.count_since(cutoff, scope.operation());
        let window_secs = config.window_duration_ms as f64 / 1000.0;
        let rate = if window_secs > 0.0 {
            count as f64 / window_secs
        } else {
            0.0
        };

        let reason = if count as u64 >= u64::from(config.failure_threshold) {
            Some(format!(
                "{count} failures in the last {}ms (threshold {})",
                config.window_duration_ms, config.failure_threshold
            ))
        } else if rate >= config.failure_rate_threshold {
            Some(format!(
                "failure rate {rate:.3}/s at or above {:.3}/s",
                config.failure_rate_threshold
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                let reset_at = add_ms(now, config.trip_duration_ms);
                tracing::debug!(
                    scope = ?scope,
                    count,
                    reset_at = %reset_at,
                    "circuit breaker tripped: {reason}"
                );
                inner.tripped_until.insert(scope, reset_at);
                CircuitBreakerDecision::open(reason, config.trip_duration_ms, reset_at)
            }
            None => {
                inner.tripped_until.remove(&scope);
                CircuitBreakerDecision::closed(config.trip_duration_ms)
            }
        }
    }

    /// Stored state of the global scope. Does not re-evaluate the window.
    pub fn state(&self) -> CircuitState {
        self.state_of(&Scope::Global)
    }

    pub fn state_for(&self, operation: &str) -> CircuitState {
        self.state_of(&Scope::Operation(operation.to_string()))
    }

    fn state_of(&self, scope: &Scope) -> CircuitState {
        let now = self.clock.now();
        match self.lock().tripped_until.get(scope) {
            None => CircuitState::Closed,
            Some(until) if now < *until => CircuitState::Open { until: *until },
            Some(_) => CircuitState::HalfOpen,
        }
    }

    /// Most recent failure recorded for `operation`.
    pub fn last_error_for(&self, operation: &str) -> Option<ErrorRecord> {
        self.lock().ledger.last_for(operation).cloned()
    }

    /// Consistent copy of the ledger, oldest first.
    pub fn snapshot(&self) -> Vec<ErrorRecord> {
        self.lock().ledger.to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all failures and trip deadlines.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.ledger.clear();
        inner.tripped_until.clear();
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
