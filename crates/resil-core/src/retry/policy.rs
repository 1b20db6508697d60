use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::ErrorType;
use crate::clock::add_ms;

/// Attempts allowed per operation (including the first).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default multiplicative jitter: ±25%.
pub const DEFAULT_JITTER_RATIO: f64 = 0.25;

/// Exponent cap so `2^attempt` cannot overflow; every ceiling is reached long before.
const MAX_EXPONENT: u32 = 20;

/// Shape of the delay curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    Fixed,
    Linear,
    Exponential,
}

impl fmt::Display for BackoffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackoffType::Fixed => "fixed",
            BackoffType::Linear => "linear",
            BackoffType::Exponential => "exponential",
        };
        f.write_str(s)
    }
}

/// When and how to retry. Advisory only; the caller owns the actual wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySchedule {
    pub delay_ms: u64,
    pub max_attempts: u32,
    /// Attempt number the retry will carry (`attempt_number + 1`).
    pub current_attempt: u32,
    pub backoff_type: BackoffType,
    /// `now + delay_ms` at computation time. Re-request if acting much later.
    pub next_retry_at: DateTime<Utc>,
}

impl RetrySchedule {
    /// Build a schedule from a pre-drawn jitter factor.
    ///
    /// `jitter_factor` is the multiplier applied to the clamped delay
    /// (e.g. `0.75..=1.25`); negative results clamp to zero.
    pub fn compute(
        error_type: ErrorType,
        attempt_number: u32,
        now: DateTime<Utc>,
        jitter_factor: f64,
        max_attempts: u32,
    ) -> Self {
        let delay_ms = apply_jitter(backoff_delay_ms(error_type, attempt_number), jitter_factor);
        Self {
            delay_ms,
            max_attempts,
            current_attempt: attempt_number.saturating_add(1),
            backoff_type: BackoffType::Exponential,
            next_retry_at: add_ms(now, delay_ms),
        }
    }
}

/// Starting delay for the exponential curve.
pub fn base_delay_ms(error_type: ErrorType) -> u64 {
    match error_type {
        ErrorType::RateLimited => 30_000,
        ErrorType::ServerError => 5_000,
        ErrorType::NetworkTimeout => 2_000,
        _ => 1_000,
    }
}

/// Upper bound on the pre-jitter delay.
pub fn max_delay_ms(error_type: ErrorType) -> u64 {
    match error_type {
        ErrorType::RateLimited => 300_000,
        _ => 30_000,
    }
}

/// Pre-jitter delay: `min(base * 2^attempt, ceiling)`.
pub fn backoff_delay_ms(error_type: ErrorType, attempt_number: u32) -> u64 {
    let exp = 1u64 << attempt_number.min(MAX_EXPONENT);
    base_delay_ms(error_type)
        .saturating_mul(exp)
        .min(max_delay_ms(error_type))
}

/// Scale a delay by `factor`, clamping to `>= 0`.
pub fn apply_jitter(delay_ms: u64, factor: f64) -> u64 {
    let jittered = delay_ms as f64 * factor;
    if jittered.is_finite() && jittered > 0.0 {
        jittered.round() as u64
    } else {
        0
    }
}
