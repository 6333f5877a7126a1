//! Follow mode: a stream of changes over a [`LogWatcher`].

use crate::change::ChangeResult;
use crate::error::Result;
use crate::log_watcher::LogWatcher;
use crate::source::LogSource;
use futures::stream::{self, BoxStream, StreamExt};
use std::time::Duration;

/// A boxed stream of log changes.
pub type LogChanges = BoxStream<'static, Result<ChangeResult>>;

struct FollowState<S: LogSource> {
    watcher: LogWatcher<S>,
    reseek: bool,
}

impl<S> LogWatcher<S>
where
    S: LogSource + Send + 'static,
{
    /// Turns the watcher into a stream that yields every append and
    /// invalidation, waiting up to `idle` per round before checking again.
    ///
    /// The stream owns the watcher, so after yielding
    /// [`ChangeResult::Invalidated`] it seeks to the end of the new log by
    /// itself. The first error is yielded and then the stream ends.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use log_watcher::LogWatcher;
    /// use std::time::Duration;
    /// use tokio_stream::StreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let mut watcher = LogWatcher::open("/var/log/syslog")?;
    ///     watcher.seek_to_end()?;
    ///
    ///     let mut changes = watcher.changes(Duration::from_secs(1));
    ///     while let Some(change) = changes.next().await {
    ///         println!("{}", change?);
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn changes(self, idle: Duration) -> LogChanges {
        let state = FollowState {
            watcher: self,
            reseek: false,
        };

        stream::unfold(Some(state), move |state| async move {
            let mut state = state?;

            if state.reseek {
                if let Err(e) = state.watcher.seek_to_end() {
                    return Some((Err(e), None));
                }
                state.reseek = false;
            }

            loop {
                match state.watcher.wait(idle).await {
                    Ok(ChangeResult::NoChange) => continue,
                    Ok(change) => {
                        state.reseek = change == ChangeResult::Invalidated;
                        return Some((Ok(change), Some(state)));
                    }
                    Err(e) => return Some((Err(e), None)),
                }
            }
        })
        .boxed()
    }
}
