//! Error classification.
//!
//! Maps a raw failure signal (code, optional message, optional HTTP-like
//! status, attempt count) to an `ErrorClassification` so that the planner,
//! the reporting rules and UI callers share one consistent taxonomy.
//!
//! Precedence when picking the type:
//! 1. a network/connection/timeout marker on the code,
//! 2. the HTTP status table,
//! 3. the code alone (structured mapping, then the legacy keyword shim).
//!
//! Classification is total: unmapped input degrades to `Unknown`/`Medium`.

mod code;
mod legacy;
mod rules;
mod types;

pub use code::ErrorCode;
pub use rules::{type_for_status, RETRY_CEILING};
pub use types::{ErrorClassification, ErrorSeverity, ErrorType, SuggestedAction};

use crate::context::ErrorContext;

/// Classify a raw error code as received from a network/database client.
pub fn classify(
    error_code: &str,
    error_message: Option<&str>,
    http_status: Option<u16>,
    context: &ErrorContext,
) -> ErrorClassification {
    let code = ErrorCode::parse(error_code);
    let mut out = classify_code(&code, error_message, http_status, context);
    out.error_code = error_code.to_string();
    out
}

/// Classify an already-structured error code.
pub fn classify_code(
    code: &ErrorCode,
    error_message: Option<&str>,
    http_status: Option<u16>,
    context: &ErrorContext,
) -> ErrorClassification {
    let attempt = context.attempt();
    let error_type = determine_type(code, error_message, http_status);
    let severity = rules::severity(error_type, attempt);
    let is_retryable = rules::is_retryable(error_type, attempt);

    ErrorClassification {
        error_code: code.to_string(),
        error_type,
        severity,
        is_retryable,
        is_user_facing: rules::is_user_facing(error_type, severity),
        suggested_action: rules::suggested_action(error_type, severity, is_retryable),
        user_message: rules::user_message(error_type).to_string(),
    }
}

fn determine_type(code: &ErrorCode, message: Option<&str>, http_status: Option<u16>) -> ErrorType {
    if let Some(ty) = code.network_type() {
        return ty;
    }
    match http_status {
        Some(status) => type_for_status(status),
        None => code.error_type(message).unwrap_or(ErrorType::Unknown),
    }
}
