//! Fallback table: what to do instead of (or while) retrying.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::ErrorType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackAction {
    /// Serve previously cached data.
    UseCache,
    /// Park the write and replay it later.
    QueueForLater,
    UseDefault,
    SkipOperation,
}

impl fmt::Display for FallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FallbackAction::UseCache => "use_cache",
            FallbackAction::QueueForLater => "queue_for_later",
            FallbackAction::UseDefault => "use_default",
            FallbackAction::SkipOperation => "skip_operation",
        };
        f.write_str(s)
    }
}

const READ_MARKERS: &[&str] = &["sync", "fetch"];
const WRITE_MARKERS: &[&str] = &["create", "update"];

/// Look up the fallback for a failure type on a named operation.
pub fn fallback_for(error_type: ErrorType, operation: &str) -> Option<FallbackAction> {
    let op = operation.to_ascii_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| op.contains(m));
    match error_type {
        t if t.is_network() && has(READ_MARKERS) => Some(FallbackAction::UseCache),
        t if t.is_network() && has(WRITE_MARKERS) => Some(FallbackAction::QueueForLater),
        ErrorType::ServerError => Some(FallbackAction::UseCache),
        ErrorType::RateLimited => Some(FallbackAction::QueueForLater),
        _ => None,
    }
}
