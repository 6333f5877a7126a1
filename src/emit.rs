//! Writing the probe entry whose arrival the watcher should notice.

use crate::error::{Error, Result};
use std::ffi::CStr;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Message written when none is configured.
pub const DEFAULT_MESSAGE: &str = "test message";

/// syslog ident used for the probe entry. openlog keeps this pointer, so it
/// must stay `'static`.
pub const SYSLOG_IDENT: &CStr = c"sd-journal-process-test";

/// Where the probe entry goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitMode {
    /// Through the system logger (`syslog(3)`).
    #[default]
    Syslog,
    /// Appended directly to the watched file.
    File,
    /// Nothing is written.
    None,
}

/// Writes `message` using `mode`. `path` is the watched log, used by
/// [`EmitMode::File`].
pub fn emit(mode: EmitMode, path: &Path, message: &str) -> Result<()> {
    tracing::debug!(?mode, probe = message, "emitting probe entry");
    match mode {
        EmitMode::Syslog => emit_syslog(message),
        EmitMode::File => append_line(path, message),
        EmitMode::None => Ok(()),
    }
}

/// Appends `message` and a newline to `path`.
pub fn append_line(path: &Path, message: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(Error::Emit)?;

    writeln!(file, "{}", message).map_err(Error::Emit)?;
    file.flush().map_err(Error::Emit)?;
    Ok(())
}

#[cfg(unix)]
fn emit_syslog(message: &str) -> Result<()> {
    use std::ffi::CString;

    let message = CString::new(message).map_err(|e| {
        Error::Emit(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })?;

    // SAFETY: all pointers are NUL-terminated strings, the ident is 'static,
    // and "%s" consumes exactly one string argument.
    unsafe {
        libc::openlog(SYSLOG_IDENT.as_ptr(), libc::LOG_NDELAY | libc::LOG_PID, libc::LOG_USER);
        libc::syslog(
            libc::LOG_DAEMON | libc::LOG_ERR,
            c"%s".as_ptr(),
            message.as_ptr(),
        );
        libc::closelog();
    }
    Ok(())
}

#[cfg(not(unix))]
fn emit_syslog(_message: &str) -> Result<()> {
    Err(Error::Emit(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "syslog is only available on Unix",
    )))
}
