//! Per-call description of which logical operation failed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the failed operation and how many times it has been tried.
///
/// Built fresh at each call site; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Caller-chosen name of the logical request (e.g. `fetch_feed`).
    pub operation: String,
    /// 1-based attempt counter.
    pub attempt_number: u32,
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            attempt_number: 1,
            last_attempt_at: None,
            additional_info: HashMap::new(),
        }
    }

    pub fn with_attempt(mut self, attempt_number: u32) -> Self {
        self.attempt_number = attempt_number;
        self
    }

    pub fn at(mut self, last_attempt_at: DateTime<Utc>) -> Self {
        self.last_attempt_at = Some(last_attempt_at);
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// Attempt number as the engine sees it.
    ///
    /// Zero is a caller bug: it trips a debug assertion and is clamped to 1
    /// in release builds.
    pub fn attempt(&self) -> u32 {
        debug_assert!(
            self.attempt_number >= 1,
            "attempt_number must be >= 1 (operation {})",
            self.operation
        );
        self.attempt_number.max(1)
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new("")
    }
}
