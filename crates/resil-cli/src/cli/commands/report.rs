//! `resil report` – reporting verdict for one failure.

use anyhow::Result;
use resil_core::config::EngineConfig;
use resil_core::{ErrorContext, ErrorReportDecision, ErrorType, RecoveryEngine};
use serde::Serialize;

use super::print_json;

#[derive(Debug, Serialize)]
struct ReportOutput {
    error_type: ErrorType,
    #[serde(flatten)]
    decision: ErrorReportDecision,
    /// Whether this particular occurrence passed sampling.
    admitted: bool,
}

pub fn run_report(
    cfg: &EngineConfig,
    code: &str,
    status: Option<u16>,
    operation: &str,
    attempt: u32,
    json: bool,
) -> Result<()> {
    let engine = RecoveryEngine::new(cfg);
    let ctx = ErrorContext::new(operation).with_attempt(attempt);
    let classification = engine.classify(code, None, status, &ctx);
    let decision = engine.decide_report(&classification, &ctx);
    let admitted = engine.admit_report(&classification, &ctx);

    let out = ReportOutput {
        error_type: classification.error_type,
        decision,
        admitted,
    };
    if json {
        return print_json(&out);
    }
    println!("{:<8} {}", "TYPE", out.error_type);
    println!("{:<8} {}", "REPORT", out.decision.should_report);
    println!("{:<8} {}", "SAMPLE", out.decision.should_sample);
    println!("{:<8} {}", "REASON", out.decision.reason);
    println!("{:<8} {}", "SEND", out.admitted);
    Ok(())
}
