//! Test harness: an engine on a hand-driven clock plus a caller loop that
//! honours the engine's decisions the way a repository would.

use std::sync::Arc;

use resil_core::config::{EngineConfig, RetryConfig};
use resil_core::{ErrorContext, ManualClock, RecoveryEngine, RecoveryStrategy};

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub engine: RecoveryEngine,
}

impl Harness {
    /// Seeded jitter so schedules are reproducible.
    pub fn new() -> Self {
        let cfg = EngineConfig {
            retry: Some(RetryConfig {
                seed: Some(17),
                ..RetryConfig::default()
            }),
            ..EngineConfig::default()
        };
        Self::with_config(&cfg)
    }

    pub fn with_config(cfg: &EngineConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let engine = RecoveryEngine::with_clock(cfg, clock.clone());
        Self { clock, engine }
    }

    /// Run one failing attempt through record -> classify -> plan.
    pub fn fail(
        &self,
        code: &str,
        status: Option<u16>,
        operation: &str,
        attempt: u32,
    ) -> RecoveryStrategy {
        self.engine.record_failure(code, operation, None);
        let ctx = ErrorContext::new(operation).with_attempt(attempt);
        let classification = self.engine.classify(code, None, status, &ctx);
        self.engine.plan(&classification, &ctx)
    }

    /// Keep failing with the same signal, sleeping (on the fake clock) as told,
    /// until the engine stops offering a retry. Returns every strategy seen.
    pub fn fail_until_exhausted(
        &self,
        code: &str,
        status: Option<u16>,
        operation: &str,
    ) -> Vec<RecoveryStrategy> {
        let mut seen = Vec::new();
        let mut attempt = 1;
        loop {
            let strategy = self.fail(code, status, operation, attempt);
            let next = strategy.retry_schedule.clone();
            seen.push(strategy);
            match next {
                Some(schedule) => {
                    self.clock.advance_ms(schedule.delay_ms as i64);
                    attempt = schedule.current_attempt;
                }
                None => return seen,
            }
        }
    }
}
