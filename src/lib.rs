//! Watch a log for new entries and classify each change.
//!
//! A [`LogWatcher`] owns one open log source and a cursor into it. Polling
//! reports whether entries were appended, whether the log was invalidated
//! (rotated, truncated, replaced or removed), or whether nothing changed.
//!
//! # Example
//!
//! ```rust,no_run
//! use log_watcher::{ChangeResult, LogWatcher};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut watcher = LogWatcher::open("/var/log/syslog")?;
//!     watcher.seek_to_end()?;
//!
//!     match watcher.wait(Duration::from_secs(2)).await? {
//!         ChangeResult::Appended => println!("new entries"),
//!         ChangeResult::Invalidated => watcher.seek_to_end()?,
//!         ChangeResult::NoChange => println!("quiet"),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod change;
mod error;
mod log_watcher;
mod source;
mod stream;
mod watcher;

pub mod config;
pub mod emit;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use change::{ChangeResult, Cursor};
pub use error::{Error, Result};
pub use log_watcher::LogWatcher;
pub use source::{FALLBACK_POLL_INTERVAL, FileLogSource, LogSource};
pub use stream::LogChanges;
