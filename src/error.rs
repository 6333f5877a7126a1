//! Error types for the log watcher library.

use thiserror::Error;

/// The main error type for log watcher operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The log source could not be opened (missing, unreadable, unauthorized).
    #[error("Failed to open log {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Checking the log for changes failed.
    #[error("Failed to process log changes for {path}: {source}")]
    Poll {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File watching errors from the notify crate.
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The notification channel was disconnected.
    #[error("File watcher disconnected")]
    WatcherClosed,

    /// Writing the probe entry failed.
    #[error("Failed to write log entry: {0}")]
    Emit(#[source] std::io::Error),

    /// None of the default log locations exist.
    #[error("No local log source found (tried {candidates})")]
    NoLogSource { candidates: String },

    /// The log handle has been closed.
    #[error("Log handle is closed")]
    Closed,
}

/// A convenient Result type for log watcher operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_open_error_includes_system_error() {
        let error = Error::Open {
            path: "/var/log/syslog".to_string(),
            source: IoError::new(ErrorKind::PermissionDenied, "Permission denied"),
        };

        assert_eq!(
            error.to_string(),
            "Failed to open log /var/log/syslog: Permission denied"
        );
    }

    #[test]
    fn test_poll_error_includes_system_error() {
        let error = Error::Poll {
            path: "/tmp/app.log".to_string(),
            source: IoError::other("Stale file handle"),
        };

        assert!(error.to_string().contains("/tmp/app.log"));
        assert!(error.to_string().contains("Stale file handle"));
    }

    #[test]
    fn test_watcher_error_conversion() {
        let notify_error = notify::Error::generic("Test watcher error");
        let error: Error = notify_error.into();

        match error {
            Error::Watcher(_) => {}
            _ => panic!("Expected Error::Watcher variant"),
        }

        assert!(error.to_string().contains("File watcher error"));
        assert!(error.to_string().contains("Test watcher error"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let error = Error::Emit(IoError::new(ErrorKind::BrokenPipe, "pipe closed"));
        let source = error.source().expect("emit error should carry a source");
        assert_eq!(source.to_string(), "pipe closed");
    }

    #[test]
    fn test_no_log_source_error() {
        let error = Error::NoLogSource {
            candidates: "/var/log/syslog, /var/log/messages".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "No local log source found (tried /var/log/syslog, /var/log/messages)"
        );
    }

    #[test]
    fn test_closed_error() {
        let error = Error::Closed;
        assert_eq!(error.to_string(), "Log handle is closed");
        assert_eq!(format!("{:?}", error), "Closed");
    }

    #[test]
    fn test_error_send_sync_traits() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
