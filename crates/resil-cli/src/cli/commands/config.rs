//! `resil config` – where the config lives and what is in effect.

use anyhow::Result;
use resil_core::config::{self, EngineConfig};
use std::path::Path;

pub fn run_config(cfg: &EngineConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
