//! Error classification and recovery engine.
//!
//! Given a raw failure (code, message, optional status) and the operation it
//! came from, the engine computes what happened, whether and when to retry,
//! what to fall back to, and whether to report it. It performs no I/O and
//! never sleeps: callers act on the returned decisions.

pub mod config;
pub mod logging;

pub mod breaker;
pub mod classify;
pub mod clock;
pub mod context;
pub mod engine;
pub mod error;
pub mod plan;
pub mod report;
pub mod retry;

pub use breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerDecision, CircuitState, ErrorRecord,
};
pub use classify::{
    classify, classify_code, ErrorClassification, ErrorCode, ErrorSeverity, ErrorType,
    SuggestedAction,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::ErrorContext;
pub use engine::RecoveryEngine;
pub use error::{ConfigError, ParseErrorTypeError};
pub use plan::{plan, FallbackAction, RecoveryStrategy};
pub use report::{decide, ErrorReportDecision, ReportReason, ReportSampler};
pub use retry::{BackoffType, RetrySchedule, RetryScheduler};
