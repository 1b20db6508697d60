//! Retry and backoff policy.
//!
//! Exponential backoff with multiplicative jitter, per error type. The
//! scheduler only produces the plan; sleeping, timers, and cancellation
//! belong to the caller.

mod policy;
mod scheduler;

pub use policy::{
    apply_jitter, backoff_delay_ms, base_delay_ms, max_delay_ms, BackoffType, RetrySchedule,
    DEFAULT_JITTER_RATIO, DEFAULT_MAX_ATTEMPTS,
};
pub use scheduler::RetryScheduler;
