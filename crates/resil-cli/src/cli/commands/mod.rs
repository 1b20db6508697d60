//! CLI command handlers, one file per subcommand.

mod breaker;
mod classify;
mod config;
mod report;
mod schedule;

pub use breaker::{run_breaker, Failure};
pub use classify::run_classify;
pub use config::run_config;
pub use report::run_report;
pub use schedule::run_schedule;

use anyhow::Result;
use serde::Serialize;

/// Pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
