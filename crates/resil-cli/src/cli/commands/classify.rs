//! `resil classify` – classify one failure and plan its recovery.

use anyhow::Result;
use resil_core::config::EngineConfig;
use resil_core::{ErrorClassification, ErrorContext, RecoveryEngine, RecoveryStrategy};
use serde::Serialize;

use super::print_json;

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    classification: ErrorClassification,
    strategy: RecoveryStrategy,
}

pub fn run_classify(
    cfg: &EngineConfig,
    code: &str,
    message: Option<&str>,
    status: Option<u16>,
    operation: &str,
    attempt: u32,
    json: bool,
) -> Result<()> {
    let engine = RecoveryEngine::new(cfg);
    let ctx = ErrorContext::new(operation).with_attempt(attempt);
    let classification = engine.classify(code, message, status, &ctx);
    let strategy = engine.plan(&classification, &ctx);
    tracing::debug!(
        code,
        operation,
        attempt,
        error_type = %classification.error_type,
        "classified failure"
    );

    if json {
        return print_json(&ClassifyOutput {
            classification,
            strategy,
        });
    }

    let c = &classification;
    println!("{:<12} {}", "TYPE", c.error_type);
    println!("{:<12} {}", "SEVERITY", c.severity);
    println!("{:<12} {}", "RETRYABLE", c.is_retryable);
    println!("{:<12} {}", "ACTION", c.suggested_action);
    match &strategy.retry_schedule {
        Some(s) => println!(
            "{:<12} attempt {}/{} in {} ms ({})",
            "RETRY", s.current_attempt, s.max_attempts, s.delay_ms, s.next_retry_at
        ),
        None => println!("{:<12} -", "RETRY"),
    }
    let fallback = strategy
        .fallback_action
        .map(|f| f.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("{:<12} {}", "FALLBACK", fallback);
    println!("{:<12} {}", "REPORT", strategy.should_report);
    if strategy.should_notify_user {
        println!("{:<12} {}", "MESSAGE", strategy.user_message);
    }
    Ok(())
}
