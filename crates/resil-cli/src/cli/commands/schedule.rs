//! `resil schedule` – retry delay for an error type and attempt.

use anyhow::Result;
use resil_core::config::EngineConfig;
use resil_core::{ErrorType, RecoveryEngine};

use super::print_json;

pub fn run_schedule(cfg: &EngineConfig, error_type: &str, attempt: u32, json: bool) -> Result<()> {
    let error_type: ErrorType = error_type.parse()?;
    let engine = RecoveryEngine::new(cfg);
    let schedule = engine.scheduler().schedule(error_type, attempt);

    if json {
        return print_json(&schedule);
    }
    println!("{:<10} {} ms", "DELAY", schedule.delay_ms);
    println!(
        "{:<10} {}/{}",
        "ATTEMPT", schedule.current_attempt, schedule.max_attempts
    );
    println!("{:<10} {}", "BACKOFF", schedule.backoff_type);
    println!("{:<10} {}", "AT", schedule.next_retry_at);
    Ok(())
}
