//! Compatibility shim for unstructured legacy error strings.
//!
//! Substring matching is fragile; it only runs for codes that did not parse
//! into a known `ErrorCode`. Input is lowercased and spaces/dashes are folded
//! to `_` before matching.

use super::types::ErrorType;

const NETWORK_MARKERS: &[&str] = &[
    "network",
    "connection",
    "timeout",
    "timedout",
    "timed_out",
    "offline",
];

/// Checked in order; the first table with a hit wins.
const KEYWORDS: &[(&[&str], ErrorType)] = &[
    (&["forbidden", "permission", "denied"], ErrorType::AuthorizationDenied),
    (&["auth", "token", "session_expired"], ErrorType::AuthenticationExpired),
    (&["valid", "bad_request", "malformed"], ErrorType::ValidationError),
    (&["conflict"], ErrorType::ConflictError),
    (
        &["rate_limit", "ratelimit", "throttl", "too_many"],
        ErrorType::RateLimited,
    ),
    (&["not_found", "notfound", "missing"], ErrorType::ResourceNotFound),
    (&["server", "internal", "unavailable"], ErrorType::ServerError),
];

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// Network-family type when the string carries a network/connection/timeout marker.
pub(crate) fn network_type(raw: &str) -> Option<ErrorType> {
    let s = normalize(raw);
    if !NETWORK_MARKERS.iter().any(|m| s.contains(m)) {
        return None;
    }
    if ["timeout", "timedout", "timed_out"].iter().any(|m| s.contains(m)) {
        Some(ErrorType::NetworkTimeout)
    } else if s.contains("offline") {
        Some(ErrorType::NetworkOffline)
    } else {
        Some(ErrorType::NetworkError)
    }
}

/// Last-resort keyword match for auth/validation/conflict/rate-limit style strings.
pub(crate) fn keyword_type(raw: &str) -> Option<ErrorType> {
    let s = normalize(raw);
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| s.contains(w)))
        .map(|(_, ty)| *ty)
}
