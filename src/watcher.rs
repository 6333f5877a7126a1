//! File watching functionality using the notify crate.
//!
//! Events are only used as wake-up hints. Whether anything actually changed
//! is always decided by re-checking the file itself.

use crate::error::{Error, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Watches the directory containing a log file and reports events touching it.
pub(crate) struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<notify::Result<Event>>,
    file_path: PathBuf,
    file_name: String,
}

impl FileWatcher {
    /// Creates a watcher for `path`. Nothing is watched until [`start_watching`].
    ///
    /// [`start_watching`]: FileWatcher::start_watching
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();

        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            file_path,
            file_name,
        })
    }

    /// Starts watching the parent directory so renames and re-creation of the
    /// file are seen too.
    pub(crate) fn start_watching(&mut self) -> Result<()> {
        let watch_path = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self._watcher.watch(watch_path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    /// Returns the next file system event.
    pub(crate) async fn next_event(&mut self) -> Option<notify::Result<Event>> {
        self.receiver.recv().await
    }

    /// Discards queued events without waiting and returns how many there were.
    pub(crate) fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.receiver.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }

    #[cfg(test)]
    pub fn pending_events(&self) -> usize {
        self.receiver.len()
    }

    /// Waits until an event concerning the watched file arrives.
    pub(crate) async fn next_relevant_event(&mut self) -> Result<()> {
        loop {
            match self.next_event().await {
                Some(Ok(event)) => {
                    if is_event_relevant_to_file(&event, &self.file_name) {
                        tracing::trace!(kind = ?event.kind, "log file event");
                        return Ok(());
                    }
                }
                Some(Err(e)) => return Err(Error::Watcher(e)),
                None => return Err(Error::WatcherClosed),
            }
        }
    }

    #[cfg(test)]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Check if a notify event is relevant to a specific file
pub(crate) fn is_event_relevant_to_file(event: &Event, target_file_name: &str) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy() == target_file_name)
            .unwrap_or(false)
    })
}
