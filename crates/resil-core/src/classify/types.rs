//! Failure taxonomy produced by the classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseErrorTypeError;

/// What kind of failure occurred. Exactly one per classified error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Device has no connectivity.
    NetworkOffline,
    /// Request left the device but no answer arrived in time.
    NetworkTimeout,
    /// Any other transport-level failure (DNS, reset, TLS).
    NetworkError,
    /// Session/token expired; a refresh may fix it.
    AuthenticationExpired,
    /// Caller is authenticated but not allowed.
    AuthorizationDenied,
    ValidationError,
    ResourceNotFound,
    ConflictError,
    /// Server asked us to slow down (429).
    RateLimited,
    /// 5xx from the backend.
    ServerError,
    Unknown,
}

impl ErrorType {
    pub const ALL: [ErrorType; 11] = [
        ErrorType::NetworkOffline,
        ErrorType::NetworkTimeout,
        ErrorType::NetworkError,
        ErrorType::AuthenticationExpired,
        ErrorType::AuthorizationDenied,
        ErrorType::ValidationError,
        ErrorType::ResourceNotFound,
        ErrorType::ConflictError,
        ErrorType::RateLimited,
        ErrorType::ServerError,
        ErrorType::Unknown,
    ];

    /// Offline, timeout, or generic transport failure.
    pub fn is_network(self) -> bool {
        matches!(
            self,
            ErrorType::NetworkOffline | ErrorType::NetworkTimeout | ErrorType::NetworkError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::NetworkOffline => "network_offline",
            ErrorType::NetworkTimeout => "network_timeout",
            ErrorType::NetworkError => "network_error",
            ErrorType::AuthenticationExpired => "authentication_expired",
            ErrorType::AuthorizationDenied => "authorization_denied",
            ErrorType::ValidationError => "validation_error",
            ErrorType::ResourceNotFound => "resource_not_found",
            ErrorType::ConflictError => "conflict_error",
            ErrorType::RateLimited => "rate_limited",
            ErrorType::ServerError => "server_error",
            ErrorType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorType {
    type Err = ParseErrorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ErrorType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseErrorTypeError(s.to_string()))
    }
}

/// How bad a failure is. Ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// High or Critical.
    pub fn is_high(self) -> bool {
        self >= ErrorSeverity::High
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorSeverity::Low => "low",
            ErrorSeverity::Medium => "medium",
            ErrorSeverity::High => "high",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// The single next step suggested to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Retry,
    WaitAndRetry,
    RefreshAuth,
    FixInput,
    ResolveConflict,
    Abort,
    Escalate,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuggestedAction::Retry => "retry",
            SuggestedAction::WaitAndRetry => "wait_and_retry",
            SuggestedAction::RefreshAuth => "refresh_auth",
            SuggestedAction::FixInput => "fix_input",
            SuggestedAction::ResolveConflict => "resolve_conflict",
            SuggestedAction::Abort => "abort",
            SuggestedAction::Escalate => "escalate",
        };
        f.write_str(s)
    }
}

/// Immutable result of classifying one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorClassification {
    /// Raw code as received from the network/database layer.
    pub error_code: String,
    pub error_type: ErrorType,
    pub severity: ErrorSeverity,
    pub is_retryable: bool,
    /// Whether the caller should surface `user_message`.
    pub is_user_facing: bool,
    pub suggested_action: SuggestedAction,
    pub user_message: String,
}
