//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;


pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_config() {
    match parse(&["resil", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_global_config_path() {
    let cli = Cli::try_parse_from(["resil", "config", "--config", "/tmp/resil.toml"]).unwrap();
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/resil.toml"))
    );
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["resil", "download"]).is_err());
}
