//! `resil breaker` – replay failures through the circuit breaker.
//!
//! Failures are recorded on a simulated clock starting at the current time,
//! `spacing_ms` apart, so a run is reproducible from its arguments.

use anyhow::{bail, Result};
use resil_core::config::EngineConfig;
use resil_core::{
    CircuitBreakerDecision, CircuitState, Clock, ManualClock, RecoveryEngine, SystemClock,
};
use serde::Serialize;
use std::sync::Arc;

use super::print_json;

/// One `code@operation` failure from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub code: String,
    pub operation: String,
}

impl Failure {
    pub fn parse(s: &str) -> Result<Self> {
        let Some((code, operation)) = s.split_once('@') else {
            bail!("expected CODE@OPERATION, got `{s}`");
        };
        let (code, operation) = (code.trim(), operation.trim());
        if code.is_empty() || operation.is_empty() {
            bail!("expected CODE@OPERATION, got `{s}`");
        }
        Ok(Self {
            code: code.to_string(),
            operation: operation.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct BreakerOutput {
    recorded: usize,
    #[serde(flatten)]
    decision: CircuitBreakerDecision,
    circuit: CircuitState,
}

pub fn run_breaker(
    cfg: &EngineConfig,
    failures: &[Failure],
    spacing_ms: u64,
    operation: Option<&str>,
    json: bool,
) -> Result<()> {
    let clock = Arc::new(ManualClock::new(SystemClock.now()));
    let engine = RecoveryEngine::with_clock(cfg, clock.clone());
    let step = i64::try_from(spacing_ms).unwrap_or(i64::MAX);

    for (i, f) in failures.iter().enumerate() {
        if i > 0 {
            clock.advance_ms(step);
        }
        engine.record_failure(&f.code, &f.operation, None);
    }

    let breaker = engine.breaker();
    let (decision, state) = match operation {
        Some(op) => (
            breaker.should_trip_for(op, engine.breaker_config()),
            breaker.state_for(op),
        ),
        None => (engine.should_trip_default(), breaker.state()),
    };
    tracing::debug!(
        recorded = breaker.len(),
        should_trip = decision.should_trip,
        "breaker replay done"
    );

    let out = BreakerOutput {
        recorded: breaker.len(),
        decision,
        circuit: state,
    };
    if json {
        return print_json(&out);
    }
    println!("{:<9} {}", "RECORDED", out.recorded);
    println!("{:<9} {}", "TRIP", out.decision.should_trip);
    if let Some(reason) = &out.decision.reason {
        println!("{:<9} {}", "REASON", reason);
    }
    if let Some(reset_at) = out.decision.reset_at {
        println!("{:<9} {}", "RESET_AT", reset_at);
    }
    Ok(())
}
