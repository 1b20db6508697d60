//! Time-ordered failure ledger backing the circuit breaker.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error_code: String,
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Records ordered oldest-first. Appends come from one clock, so pruning only
/// ever pops from the front.
#[derive(Debug, Default)]
pub(super) struct Ledger {
    records: VecDeque<ErrorRecord>,
}

impl Ledger {
    pub(super) fn push(&mut self, record: ErrorRecord) {
        // A clock that stepped backwards would break front pruning; pin to the newest stamp.
        let record = match self.records.back() {
            Some(last) if record.timestamp < last.timestamp => ErrorRecord {
                timestamp: last.timestamp,
                ..record
            },
            _ => record,
        };
        self.records.push_back(record);
    }

    /// Drop records strictly older than `cutoff`. Returns how many went.
    pub(super) fn prune_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut dropped = 0;
        while self
            .records
            .front()
            .is_some_and(|r| r.timestamp < cutoff)
        {
            self.records.pop_front();
            dropped += 1;
        }
        dropped
    }

    /// Records at or after `cutoff`, optionally restricted to one operation.
    pub(super) fn count_since(&self, cutoff: DateTime<Utc>, operation: Option<&str>) -> usize {
        self.records
            .iter()
            .rev()
            .take_while(|r| r.timestamp >= cutoff)
            .filter(|r| operation.map_or(true, |op| r.operation == op))
            .count()
    }

    pub(super) fn last_for(&self, operation: &str) -> Option<&ErrorRecord> {
        self.records.iter().rev().find(|r| r.operation == operation)
    }

    pub(super) fn len(&self) -> usize {
        self.records.len()
    }

    pub(super) fn clear(&mut self) {
        self.records.clear();
    }

    pub(super) fn to_vec(&self) -> Vec<ErrorRecord> {
        self.records.iter().cloned().collect()
    }
}
