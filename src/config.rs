//! Command line and environment configuration for the `log-watcher` binary.

use crate::emit::{DEFAULT_MESSAGE, EmitMode};
use crate::error::{Error, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the local system log usually lives, in order of preference.
pub const DEFAULT_LOG_CANDIDATES: &[&str] =
    &["/var/log/syslog", "/var/log/messages", "/var/log/user.log"];

/// Emit a test entry to the local log and report how the log changed.
///
/// Prints one of `nop`, `append` or `invalidate`.
#[derive(Parser, Debug, Clone)]
#[command(name = "log-watcher", version, about, long_about = None)]
pub struct Args {
    /// Log file to watch (defaults to the first existing system log)
    #[arg(long, env = "LOG_WATCHER_PATH")]
    pub path: Option<PathBuf>,

    /// How to write the test entry
    #[arg(long, value_enum, env = "LOG_WATCHER_EMIT", default_value_t = EmitMode::Syslog)]
    pub emit: EmitMode,

    /// Text of the test entry
    #[arg(long, env = "LOG_WATCHER_MESSAGE", default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// Milliseconds to wait after writing before checking the log
    #[arg(long, env = "LOG_WATCHER_SETTLE_MS", default_value_t = 1000)]
    pub settle_ms: u64,

    /// Wait up to this many milliseconds for a change instead of checking once
    #[arg(long, env = "LOG_WATCHER_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Keep printing changes until interrupted
    #[arg(long)]
    pub follow: bool,
}

impl Args {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// The configured path, or the first default candidate that exists.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => find_default_log(DEFAULT_LOG_CANDIDATES),
        }
    }
}

/// Returns the first candidate that exists.
pub fn find_default_log<P: AsRef<Path>>(candidates: &[P]) -> Result<PathBuf> {
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .find(|candidate| candidate.exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::NoLogSource {
            candidates: candidates
                .iter()
                .map(|candidate| candidate.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
