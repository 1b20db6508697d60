//! Breaker configuration and decision value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied trip thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// In-window failure count that trips the breaker.
    pub failure_threshold: u32,
    /// In-window failures per second that trips the breaker.
    pub failure_rate_threshold: f64,
    pub window_duration_ms: u64,
    /// Cooldown once tripped.
    pub trip_duration_ms: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            failure_rate_threshold: 0.5,
            window_duration_ms: 60_000,
            trip_duration_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerDecision {
    pub should_trip: bool,
    pub reason: Option<String>,
    pub trip_duration_ms: u64,
    /// When the caller may try again. Present only when tripped.
    pub reset_at: Option<DateTime<Utc>>,
}

impl CircuitBreakerDecision {
    pub(super) fn closed(trip_duration_ms: u64) -> Self {
        Self {
            should_trip: false,
            reason: None,
            trip_duration_ms,
            reset_at: None,
        }
    }

    pub(super) fn open(reason: String, trip_duration_ms: u64, reset_at: DateTime<Utc>) -> Self {
        Self {
            should_trip: true,
            reason: Some(reason),
            trip_duration_ms,
            reset_at: Some(reset_at),
        }
    }
}

/// Stored breaker state for one scope (global or a single operation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CircuitState {
    /// Calls allowed.
    Closed,
    /// Tripped; calls must be held back until `until`.
    Open { until: DateTime<Utc> },
    /// Cooldown elapsed; the next `should_trip` re-evaluates the window.
    HalfOpen,
}
