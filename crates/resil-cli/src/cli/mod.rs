//! CLI for the resil recovery engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use resil_core::config;
use std::path::PathBuf;

use commands::{run_breaker, run_classify, run_config, run_report, run_schedule, Failure};

/// Top-level CLI for the resil recovery engine.
#[derive(Debug, Parser)]
#[command(name = "resil")]
#[command(about = "resil: classify failures and decide how to recover", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Classify one failure and print the recovery strategy.
    Classify {
        /// Error code as reported by the failing layer.
        code: String,
        #[arg(long)]
        message: Option<String>,
        /// HTTP status, if the failure came from an HTTP response.
        #[arg(long)]
        status: Option<u16>,
        #[arg(long, default_value = "unknown_operation")]
        operation: String,
        /// 1-based attempt that just failed.
        #[arg(
            long,
            default_value = "1",
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        attempt: u32,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Compute the retry schedule for an error type and attempt.
    Schedule {
        /// Error type name, e.g. `rate_limited` or `network_timeout`.
        error_type: String,
        #[arg(
            long,
            default_value = "1",
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        attempt: u32,
        #[arg(long)]
        json: bool,
    },

    /// Decide whether a failure should be reported.
    Report {
        code: String,
        #[arg(long)]
        status: Option<u16>,
        #[arg(long, default_value = "unknown_operation")]
        operation: String,
        #[arg(
            long,
            default_value = "1",
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        attempt: u32,
        #[arg(long)]
        json: bool,
    },

    /// Replay failures through the circuit breaker and print its verdict.
    Breaker {
        /// Failure to record, as `code@operation`. Repeatable.
        #[arg(long = "failure", value_name = "CODE@OP", value_parser = Failure::parse)]
        failures: Vec<Failure>,
        /// Simulated time between consecutive failures.
        #[arg(long, default_value = "0", value_name = "MS")]
        spacing_ms: u64,
        /// Judge only this operation's failures.
        #[arg(long)]
        operation: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Show the config file path and effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!(command = ?cli.command, "loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Classify {
                code,
                message,
                status,
                operation,
                attempt,
                json,
            } => run_classify(
                &cfg,
                &code,
                message.as_deref(),
                status,
                &operation,
                attempt,
                json,
            )?,
            CliCommand::Schedule {
                error_type,
                attempt,
                json,
            } => run_schedule(&cfg, &error_type, attempt, json)?,
            CliCommand::Report {
                code,
                status,
                operation,
                attempt,
                json,
            } => run_report(&cfg, &code, status, &operation, attempt, json)?,
            CliCommand::Breaker {
                failures,
                spacing_ms,
                operation,
                json,
            } => run_breaker(&cfg, &failures, spacing_ms, operation.as_deref(), json)?,
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
