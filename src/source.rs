//! Log sources: the capability a [`LogWatcher`](crate::LogWatcher) drives.

use crate::change::{ChangeResult, Cursor};
use crate::error::{Error, Result};
use crate::watcher::FileWatcher;
use std::fs::{File, Metadata};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long [`LogSource::changed`] sleeps for backends without notifications.
pub const FALLBACK_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// An append-only log that can be polled for changes.
///
/// Opening is backend specific and happens before a value exists; closing is
/// `Drop`.
pub trait LogSource {
    /// Moves the cursor just past the newest entry.
    fn seek_to_end(&mut self) -> Result<()>;

    /// Non-blocking check for changes since the last poll or seek.
    fn poll(&mut self) -> Result<ChangeResult>;

    /// Current read position.
    fn cursor(&self) -> Cursor;

    /// Resolves when the backend may have new activity. Spurious wake-ups are
    /// fine; callers re-check with [`poll`](LogSource::poll).
    fn changed(&mut self) -> impl Future<Output = Result<()>> + Send {
        async {
            tokio::time::sleep(FALLBACK_POLL_INTERVAL).await;
            Ok(())
        }
    }
}

/// Identity of an open file, used to detect replacement of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }

    #[cfg(not(unix))]
    fn of(_metadata: &Metadata) -> Self {
        Self {}
    }
}

/// A plain log file, such as `/var/log/syslog`.
///
/// Changes are classified from the file size and identity alone. A
/// copytruncate rotation that grows back past the cursor before the next
/// poll is therefore reported as [`ChangeResult::Appended`], not
/// [`ChangeResult::Invalidated`].
pub struct FileLogSource {
    path: PathBuf,
    file: File,
    identity: FileIdentity,
    cursor: Cursor,
    invalidated: bool,
    watcher: FileWatcher,
}

impl FileLogSource {
    /// Opens `path` with the cursor at the start of the log.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (file, metadata) = open_file(&path)?;

        let mut watcher = FileWatcher::new(&path)?;
        watcher.start_watching()?;

        tracing::info!(path = %path.display(), size = metadata.len(), "opened log");

        Ok(Self {
            identity: FileIdentity::of(&metadata),
            path,
            file,
            cursor: Cursor::default(),
            invalidated: false,
            watcher,
        })
    }

    fn poll_error(&self, source: std::io::Error) -> Error {
        Error::Poll {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Inspects the path and the open handle without touching the cursor.
    fn observe(&self) -> Result<Observation> {
        let on_disk = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Observation::Removed),
            Err(e) => return Err(self.poll_error(e)),
        };

        if FileIdentity::of(&on_disk) != self.identity {
            return Ok(Observation::Replaced);
        }

        let size = self.file.metadata().map_err(|e| self.poll_error(e))?.len();
        Ok(Observation::Size(size))
    }
}

impl LogSource for FileLogSource {
    fn seek_to_end(&mut self) -> Result<()> {
        self.watcher.drain();
        let (file, metadata) = open_file(&self.path)?;
        let identity = FileIdentity::of(&metadata);
        let size = metadata.len();

        if self.invalidated || identity != self.identity || size < self.cursor.offset() {
            tracing::debug!(path = %self.path.display(), size, "re-seeking onto new log");
            self.file = file;
            self.identity = identity;
            self.cursor.rebase(size);
        } else {
            self.cursor.advance_to(size);
        }

        self.invalidated = false;
        Ok(())
    }

    fn poll(&mut self) -> Result<ChangeResult> {
        // Queued events only matter to `changed`; the checks below see
        // everything they could report.
        self.watcher.drain();

        if self.invalidated {
            return Ok(ChangeResult::Invalidated);
        }

        let change = match self.observe()? {
            Observation::Removed | Observation::Replaced => ChangeResult::Invalidated,
            Observation::Size(size) => {
                let change = classify_size(size, self.cursor.offset());
                if change == ChangeResult::Appended {
                    self.cursor.advance_to(size);
                }
                change
            }
        };

        if change == ChangeResult::Invalidated {
            tracing::warn!(path = %self.path.display(), "log invalidated");
            self.invalidated = true;
        }

        tracing::debug!(%change, offset = self.cursor.offset(), "polled log");
        Ok(change)
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn changed(&mut self) -> impl Future<Output = Result<()>> + Send {
        self.watcher.next_relevant_event()
    }
}

enum Observation {
    Removed,
    Replaced,
    Size(u64),
}

fn open_file(path: &Path) -> Result<(File, Metadata)> {
    let open_error = |source| Error::Open {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(open_error)?;
    let metadata = file.metadata().map_err(open_error)?;
    Ok((file, metadata))
}

/// Classifies a same-file size against the cursor offset.
fn classify_size(current_size: u64, cursor_offset: u64) -> ChangeResult {
    if detect_file_truncation(current_size, cursor_offset) {
        ChangeResult::Invalidated
    } else if calculate_bytes_appended(current_size, cursor_offset).is_some() {
        ChangeResult::Appended
    } else {
        ChangeResult::NoChange
    }
}

/// Detect if the file was truncated by comparing current size with the cursor
fn detect_file_truncation(current_size: u64, cursor_offset: u64) -> bool {
    current_size < cursor_offset
}

/// Bytes written past the cursor, if any
fn calculate_bytes_appended(current_size: u64, cursor_offset: u64) -> Option<u64> {
    if current_size <= cursor_offset {
        None
    } else {
        Some(current_size - cursor_offset)
    }
}
