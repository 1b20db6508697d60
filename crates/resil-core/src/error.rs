//! Errors for the fallible edges of the engine (configuration, parsing).
//!
//! Decision functions are total and have no error type of their own.

use thiserror::Error;

/// A configuration value the engine cannot work with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("circuit_breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,
    #[error("circuit_breaker.failure_rate_threshold must be positive (got {0})")]
    NonPositiveFailureRate(f64),
    #[error("circuit_breaker.window_duration_ms must be positive")]
    ZeroWindow,
    #[error("ledger_retention_secs ({retention_secs}s) is shorter than the breaker window ({window_ms}ms)")]
    RetentionShorterThanWindow { retention_secs: u64, window_ms: u64 },
    #[error("retry.jitter_ratio must be in [0, 1) (got {0})")]
    JitterOutOfRange(f64),
    #[error("retry.max_attempts must be at least 1")]
    ZeroMaxAttempts,
    #[error("reporting.sample_rate must be in [0, 1] (got {0})")]
    SampleRateOutOfRange(f64),
}

/// Input that names no `ErrorType`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown error type `{0}`")]
pub struct ParseErrorTypeError(pub String);
