//! Jittered retry scheduling with an injectable random source.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::classify::ErrorType;
use crate::clock::{Clock, SystemClock};
use crate::config::RetryConfig;

use super::policy::{RetrySchedule, DEFAULT_JITTER_RATIO, DEFAULT_MAX_ATTEMPTS};

/// Computes `RetrySchedule`s. Never sleeps.
#[derive(Debug)]
pub struct RetryScheduler {
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    jitter_ratio: f64,
    max_attempts: u32,
}

impl RetryScheduler {
    /// Scheduler on the system clock with OS-seeded jitter.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), StdRng::from_os_rng())
    }

    /// Scheduler with a seeded jitter source, for reproducible schedules.
    pub fn seeded(clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self::with_parts(clock, StdRng::seed_from_u64(seed))
    }

    pub fn with_parts(clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        Self {
            clock,
            rng: Mutex::new(rng),
            jitter_ratio: DEFAULT_JITTER_RATIO,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Build from the optional `[retry]` config section.
    pub fn from_config(clock: Arc<dyn Clock>, cfg: &RetryConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_parts(clock, rng)
            .with_jitter_ratio(cfg.jitter_ratio)
            .with_max_attempts(cfg.max_attempts)
    }

    /// Jitter half-width as a fraction of the delay, clamped to `[0, 1]`.
    pub fn with_jitter_ratio(mut self, ratio: f64) -> Self {
        self.jitter_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            DEFAULT_JITTER_RATIO
        };
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn jitter_ratio(&self) -> f64 {
        self.jitter_ratio
    }

    /// Schedule the next attempt after `attempt_number` failed with `error_type`.
    pub fn schedule(&self, error_type: ErrorType, attempt_number: u32) -> RetrySchedule {
        debug_assert!(attempt_number >= 1, "attempt_number must be >= 1");
        let attempt = attempt_number.max(1);
        RetrySchedule::compute(
            error_type,
            attempt,
            self.clock.now(),
            self.draw_factor(),
            self.max_attempts,
        )
    }

    fn draw_factor(&self) -> f64 {
        if self.jitter_ratio == 0.0 {
            return 1.0;
        }
        let ratio = self.jitter_ratio;
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        1.0 + rng.random_range(-ratio..=ratio)
    }
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::retry::policy::backoff_delay_ms;

    fn scheduler(seed: u64) -> (Arc<ManualClock>, RetryScheduler) {
        let clock = Arc::new(ManualClock::default());
        let s = RetryScheduler::seeded(clock.clone(), seed);
        (clock, s)
    }

    #[test]
    fn jitter_stays_within_quarter_of_clamped_delay() {
        let (_, s) = scheduler(7);
        for ty in ErrorType::ALL {
            for attempt in 1..=8 {
                let clamped = backoff_delay_ms(ty, attempt) as f64;
                for _ in 0..50 {
                    let d = s.schedule(ty, attempt).delay_ms as f64;
                    assert!(d >= (0.75 * clamped).floor(), "{ty} #{attempt}: {d} < 0.75*{clamped}");
                    assert!(d <= (1.25 * clamped).ceil(), "{ty} #{attempt}: {d} > 1.25*{clamped}");
                }
            }
        }
    }

    #[test]
    fn same_seed_same_schedule() {
        let (_, a) = scheduler(42);
        let (_, b) = scheduler(42);
        for attempt in 1..=5 {
            assert_eq!(
                a.schedule(ErrorType::ServerError, attempt),
                b.schedule(ErrorType::ServerError, attempt)
            );
        }
    }

    #[test]
    fn next_retry_at_is_now_plus_delay() {
        let (clock, s) = scheduler(1);
        clock.advance_ms(90_000);
        let sched = s.schedule(ErrorType::NetworkTimeout, 2);
        assert_eq!(
            sched.next_retry_at,
            clock.now() + chrono::Duration::milliseconds(sched.delay_ms as i64)
        );
        assert_eq!(sched.current_attempt, 3);
    }

    #[test]
    fn zero_jitter_is_exact() {
        let (_, s) = scheduler(3);
        let s = s.with_jitter_ratio(0.0);
        assert_eq!(s.schedule(ErrorType::RateLimited, 2).delay_ms, 120_000);
    }
}
