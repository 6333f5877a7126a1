//! The [`LogWatcher`] handle.

use crate::change::{ChangeResult, Cursor};
use crate::error::{Error, Result};
use crate::source::{FileLogSource, LogSource};
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;

/// Owns one open log source and tracks changes to it.
///
/// The source is released when the watcher is closed or dropped. After
/// [`close`](LogWatcher::close) every operation returns [`Error::Closed`].
pub struct LogWatcher<S: LogSource = FileLogSource> {
    source: Option<S>,
}

impl LogWatcher<FileLogSource> {
    /// Opens the log file at `path`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use log_watcher::LogWatcher;
    ///
    /// # fn main() -> log_watcher::Result<()> {
    /// let mut watcher = LogWatcher::open("/var/log/syslog")?;
    /// watcher.seek_to_end()?;
    /// println!("{}", watcher.poll()?);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_source(FileLogSource::open(path)?))
    }
}

impl<S: LogSource> LogWatcher<S> {
    /// Wraps an already opened source.
    pub fn from_source(source: S) -> Self {
        Self {
            source: Some(source),
        }
    }

    fn source_mut(&mut self) -> Result<&mut S> {
        self.source.as_mut().ok_or(Error::Closed)
    }

    /// Moves the cursor just past the newest entry so later polls only see
    /// new activity. Also the way to recover from [`ChangeResult::Invalidated`].
    pub fn seek_to_end(&mut self) -> Result<()> {
        self.source_mut()?.seek_to_end()
    }

    /// Non-blocking check for changes since the last poll or seek.
    pub fn poll(&mut self) -> Result<ChangeResult> {
        self.source_mut()?.poll()
    }

    /// Like [`poll`](LogWatcher::poll), but waits up to `timeout` for a change.
    /// Returns [`ChangeResult::NoChange`] if the timeout expires. A timeout too
    /// large to form a deadline (such as `Duration::MAX`) waits without one.
    pub async fn wait(&mut self, timeout: Duration) -> Result<ChangeResult> {
        let deadline = Instant::now().checked_add(timeout);

        loop {
            let change = self.poll()?;
            if change.is_change() {
                return Ok(change);
            }

            let source = self.source_mut()?;
            match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, source.changed()).await {
                    Ok(woken) => woken?,
                    Err(_) => return Ok(ChangeResult::NoChange),
                },
                None => source.changed().await?,
            }
        }
    }

    pub fn cursor(&self) -> Result<Cursor> {
        self.source
            .as_ref()
            .map(|source| source.cursor())
            .ok_or(Error::Closed)
    }

    /// Releases the source. Closing twice is an error.
    pub fn close(&mut self) -> Result<()> {
        match self.source.take() {
            Some(source) => {
                drop(source);
                tracing::debug!("closed log");
                Ok(())
            }
            None => Err(Error::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }
}
