//! Per-type tables: status mapping, severity, retryability, user-facing flag,
//! suggested action, and user message.

use super::types::{ErrorSeverity, ErrorType, SuggestedAction};

/// Attempts at or beyond this number are never retryable.
pub const RETRY_CEILING: u32 = 5;

/// Map an HTTP-like status to an error type.
pub fn type_for_status(status: u16) -> ErrorType {
    match status {
        400 | 422 => ErrorType::ValidationError,
        401 => ErrorType::AuthenticationExpired,
        403 => ErrorType::AuthorizationDenied,
        404 => ErrorType::ResourceNotFound,
        408 => ErrorType::NetworkTimeout,
        409 => ErrorType::ConflictError,
        429 => ErrorType::RateLimited,
        500..=599 => ErrorType::ServerError,
        _ => ErrorType::Unknown,
    }
}

/// Severity with attempt-based escalation. Escalation only ever raises.
pub fn severity(ty: ErrorType, attempt: u32) -> ErrorSeverity {
    match ty {
        ErrorType::NetworkOffline | ErrorType::NetworkTimeout if attempt > 3 => ErrorSeverity::High,
        ErrorType::RateLimited if attempt > 5 => ErrorSeverity::High,
        ErrorType::AuthenticationExpired
        | ErrorType::AuthorizationDenied
        | ErrorType::ServerError => ErrorSeverity::High,
        ErrorType::ValidationError => ErrorSeverity::Low,
        ErrorType::NetworkOffline
        | ErrorType::NetworkTimeout
        | ErrorType::NetworkError
        | ErrorType::RateLimited
        | ErrorType::ResourceNotFound
        | ErrorType::ConflictError
        | ErrorType::Unknown => ErrorSeverity::Medium,
    }
}

pub fn is_retryable(ty: ErrorType, attempt: u32) -> bool {
    if attempt >= RETRY_CEILING {
        return false;
    }
    match ty {
        ErrorType::NetworkOffline
        | ErrorType::NetworkTimeout
        | ErrorType::NetworkError
        | ErrorType::RateLimited
        | ErrorType::ServerError
        | ErrorType::AuthenticationExpired => true,
        ErrorType::ValidationError
        | ErrorType::AuthorizationDenied
        | ErrorType::ResourceNotFound
        | ErrorType::ConflictError => false,
        ErrorType::Unknown => attempt < 2,
    }
}

pub fn is_user_facing(ty: ErrorType, severity: ErrorSeverity) -> bool {
    match ty {
        ErrorType::ValidationError
        | ErrorType::AuthenticationExpired
        | ErrorType::AuthorizationDenied
        | ErrorType::ResourceNotFound
        | ErrorType::ConflictError
        | ErrorType::NetworkOffline => true,
        ErrorType::NetworkTimeout
        | ErrorType::NetworkError
        | ErrorType::ServerError
        | ErrorType::RateLimited
        | ErrorType::Unknown => severity.is_high(),
    }
}

pub fn suggested_action(ty: ErrorType, severity: ErrorSeverity, retryable: bool) -> SuggestedAction {
    if retryable {
        return SuggestedAction::Retry;
    }
    match ty {
        ErrorType::AuthenticationExpired => SuggestedAction::RefreshAuth,
        ErrorType::AuthorizationDenied => SuggestedAction::Escalate,
        ErrorType::ValidationError => SuggestedAction::FixInput,
        ErrorType::ConflictError => SuggestedAction::ResolveConflict,
        ErrorType::ResourceNotFound => SuggestedAction::Abort,
        ErrorType::RateLimited => SuggestedAction::WaitAndRetry,
        _ if severity.is_high() => SuggestedAction::Escalate,
        _ => SuggestedAction::Retry,
    }
}

pub fn user_message(ty: ErrorType) -> &'static str {
    match ty {
        ErrorType::NetworkOffline => {
            "You appear to be offline. Check your connection and try again."
        }
        ErrorType::NetworkTimeout => "The request took too long. Please try again.",
        ErrorType::NetworkError => "We couldn't reach the server. Please try again.",
        ErrorType::AuthenticationExpired => "Your session has expired. Please sign in again.",
        ErrorType::AuthorizationDenied => "You don't have permission to do that.",
        ErrorType::ValidationError => "Some of the information entered isn't valid. Please check it and try again.",
        ErrorType::ResourceNotFound => "We couldn't find what you were looking for.",
        ErrorType::ConflictError => {
            "This item was changed somewhere else. Review the latest version and try again."
        }
        ErrorType::RateLimited => "You're doing that too often. Please wait a moment and try again.",
        ErrorType::ServerError => "Something went wrong on our end. Please try again later.",
        ErrorType::Unknown => "Something went wrong. Please try again.",
    }
}
