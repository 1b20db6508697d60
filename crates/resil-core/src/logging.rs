//! Logging init: append to a file under the XDG state dir, or fall back to stderr.
//!
//! The decision functions themselves stay silent; events come from the
//! breaker's trip transition, config loading, and the CLI.

use anyhow::{anyhow, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,resil_core=debug,resil=debug";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

/// Per-event writer: a cloned file handle, or stderr if the clone failed.
enum LogWriter {
    File(fs::File),
    Stderr,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(f) => f.write(buf),
            LogWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(f) => f.flush(),
            LogWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct SharedFile(fs::File);

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogWriter::File)
            .unwrap_or(LogWriter::Stderr)
    }
}

/// `~/.local/state/resil/resil.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("resil")?;
    Ok(xdg_dirs.get_state_home().join("resil.log"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for `target`.
/// Errors if the log file cannot be opened or a subscriber is already set.
pub fn init(target: &LogTarget) -> Result<()> {
    let writer = match target {
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(SharedFile(file))
        }
        LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    if let LogTarget::File(path) = target {
        tracing::info!("resil logging initialized at {}", path.display());
    }
    Ok(())
}

/// Log to the XDG state file. On failure the caller should use `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    init(&LogTarget::File(log_file_path()?))
}

/// Log to stderr only. Ignores an already-installed subscriber.
pub fn init_logging_stderr() {
    let _ = init(&LogTarget::Stderr);
}
