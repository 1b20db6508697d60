//! Structured error codes accepted at the engine boundary.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::legacy;
use super::types::ErrorType;

/// Error code as emitted by the network/database clients.
///
/// Known codes map to an `ErrorType` explicitly. Anything else is kept as
/// `Other` and only interpreted by the legacy substring shim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NetworkOffline,
    NetworkTimeout,
    NetworkError,
    AuthExpired,
    AccessDenied,
    ValidationFailed,
    NotFound,
    Conflict,
    RateLimited,
    ServerError,
    /// Unstructured legacy string.
    Other(String),
}

impl ErrorCode {
    /// Parse a raw code. Never fails; unrecognised input becomes `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "network_offline" => ErrorCode::NetworkOffline,
            "network_timeout" => ErrorCode::NetworkTimeout,
            "network_error" => ErrorCode::NetworkError,
            "auth_expired" => ErrorCode::AuthExpired,
            "access_denied" => ErrorCode::AccessDenied,
            "validation_failed" => ErrorCode::ValidationFailed,
            "not_found" => ErrorCode::NotFound,
            "conflict" => ErrorCode::Conflict,
            "rate_limited" => ErrorCode::RateLimited,
            "server_error" => ErrorCode::ServerError,
            _ => ErrorCode::Other(raw.to_string()),
        }
    }

    /// Network-family type if this code marks a transport failure.
    ///
    /// Network markers win over any HTTP status that came with the failure.
    pub fn network_type(&self) -> Option<ErrorType> {
        match self {
            ErrorCode::NetworkOffline => Some(ErrorType::NetworkOffline),
            ErrorCode::NetworkTimeout => Some(ErrorType::NetworkTimeout),
            ErrorCode::NetworkError => Some(ErrorType::NetworkError),
            ErrorCode::Other(raw) => legacy::network_type(raw),
            _ => None,
        }
    }

    /// Type implied by the code alone, used when no HTTP status is present.
    pub fn error_type(&self, message: Option<&str>) -> Option<ErrorType> {
        match self {
            ErrorCode::NetworkOffline => Some(ErrorType::NetworkOffline),
            ErrorCode::NetworkTimeout => Some(ErrorType::NetworkTimeout),
            ErrorCode::NetworkError => Some(ErrorType::NetworkError),
            ErrorCode::AuthExpired => Some(ErrorType::AuthenticationExpired),
            ErrorCode::AccessDenied => Some(ErrorType::AuthorizationDenied),
            ErrorCode::ValidationFailed => Some(ErrorType::ValidationError),
            ErrorCode::NotFound => Some(ErrorType::ResourceNotFound),
            ErrorCode::Conflict => Some(ErrorType::ConflictError),
            ErrorCode::RateLimited => Some(ErrorType::RateLimited),
            ErrorCode::ServerError => Some(ErrorType::ServerError),
            ErrorCode::Other(raw) => legacy::keyword_type(raw)
                .or_else(|| message.and_then(legacy::keyword_type)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NetworkOffline => "network_offline",
            ErrorCode::NetworkTimeout => "network_timeout",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::AuthExpired => "auth_expired",
            ErrorCode::AccessDenied => "access_denied",
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::ServerError => "server_error",
            ErrorCode::Other(raw) => raw,
        }
    }
}

impl FromStr for ErrorCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ErrorCode::parse(s))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ErrorCode {
    fn from(raw: &str) -> Self {
        ErrorCode::parse(raw)
    }
}
