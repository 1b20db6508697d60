//! Time source used for retry deadlines and the failure ledger.
//!
//! Everything that stamps or compares wall-clock time goes through a `Clock`
//! so tests (and embedding callers) can drive time by hand.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of "now".
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward. Negative durations are ignored so ledger
    /// timestamps stay ordered.
    pub fn advance(&self, by: Duration) {
        if by < Duration::zero() {
            return;
        }
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now = now.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// `advance` in milliseconds, saturating at the representable maximum.
    pub fn advance_ms(&self, ms: i64) {
        if ms <= 0 {
            return;
        }
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now = add_ms(*now, ms as u64);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// `t + ms`, saturating at the representable maximum.
pub(crate) fn add_ms(t: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    Duration::try_milliseconds(ms.min(i64::MAX as u64) as i64)
        .and_then(|d| t.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `t - ms`, saturating at the representable minimum.
pub(crate) fn sub_ms(t: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    Duration::try_milliseconds(ms.min(i64::MAX as u64) as i64)
        .and_then(|d| t.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_forward_only() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance_ms(1_500);
        assert_eq!(clock.now() - start, Duration::milliseconds(1_500));
        clock.advance_ms(-10_000);
        assert_eq!(clock.now() - start, Duration::milliseconds(1_500));
    }

    #[test]
    fn millisecond_arithmetic_saturates() {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        assert_eq!(add_ms(t, 250), t + Duration::milliseconds(250));
        assert_eq!(sub_ms(t, 250), t - Duration::milliseconds(250));
        assert_eq!(add_ms(t, u64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(sub_ms(t, u64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn manual_clock_saturates_instead_of_overflowing() {
        let clock = ManualClock::default();
        clock.advance_ms(i64::MAX);
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
        clock.advance_ms(i64::MAX);
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);

        let clock = ManualClock::new(DateTime::<Utc>::MAX_UTC - Duration::seconds(1));
        clock.advance(Duration::days(1));
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
    }
}
