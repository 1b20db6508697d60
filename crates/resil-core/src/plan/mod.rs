//! Recovery strategy planning.
//!
//! Composes a classification with the retry scheduler, the fallback table,
//! and the reporting rule into one `RecoveryStrategy`. Total: every input
//! yields a strategy.

mod fallback;

use serde::{Deserialize, Serialize};

use crate::classify::{ErrorClassification, ErrorType, SuggestedAction};
use crate::context::ErrorContext;
use crate::retry::{RetrySchedule, RetryScheduler};

pub use fallback::{fallback_for, FallbackAction};

/// Attempt number from which every failure is reported.
const REPORT_FROM_ATTEMPT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryStrategy {
    pub action: SuggestedAction,
    /// Present iff the classification was retryable.
    pub retry_schedule: Option<RetrySchedule>,
    pub fallback_action: Option<FallbackAction>,
    pub should_report: bool,
    pub should_notify_user: bool,
    pub user_message: String,
}

/// Build the strategy for one classified failure.
pub fn plan(
    classification: &ErrorClassification,
    context: &ErrorContext,
    scheduler: &RetryScheduler,
) -> RecoveryStrategy {
    let attempt = context.attempt();
    let retry_schedule = classification
        .is_retryable
        .then(|| scheduler.schedule(classification.error_type, attempt));

    RecoveryStrategy {
        action: classification.suggested_action,
        retry_schedule,
        fallback_action: fallback_for(classification.error_type, &context.operation),
        should_report: should_report(classification, attempt),
        should_notify_user: classification.is_user_facing,
        user_message: classification.user_message.clone(),
    }
}

fn should_report(classification: &ErrorClassification, attempt: u32) -> bool {
    matches!(
        classification.error_type,
        ErrorType::ServerError | ErrorType::Unknown
    ) || attempt >= REPORT_FROM_ATTEMPT
        || classification.severity.is_high()
}
