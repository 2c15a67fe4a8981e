//! I/O helper utilities.
//!
//! Provides small adapters to enrich io::Error with actionable context/hints,
//! usable with map_err in both io::Result and anyhow::Result code paths.
//!
//! Usage:
//!   // in functions returning anyhow::Result<_>
//!   fs::read(input).map_err(io_error_with_help("read input", input))?;
//!
//!   // in functions returning io::Result<_>
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Platform-aware hint for an I/O error, suffixed with the raw OS code when known.
/// Returns an empty string when nothing useful can be said.
pub fn hint_for(e: &io::Error) -> String {
    let mut hint = String::new();

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let text = match code {
                libc::EACCES | libc::EPERM => {
                    Some("permission denied; check ownership and write permissions of the directory.")
                }
                libc::EXDEV => Some("cross-filesystem; atomic rename not possible."),
                libc::EBUSY => Some("resource busy; another process may hold the file."),
                libc::ETXTBSY => Some("text file busy; the target is being executed."),
                libc::ENOENT => Some("path not found; verify the directory exists."),
                libc::EEXIST => Some("already exists; temp name collision."),
                libc::ENOSPC => Some("insufficient space on device."),
                libc::EROFS => Some("read-only filesystem; cannot write here."),
                libc::EISDIR => Some("target is a directory."),
                libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments."),
                libc::EMFILE => Some("process file descriptor limit reached; close files or raise limits."),
                _ => None,
            };
            if let Some(text) = text {
                hint.push_str("; ");
                hint.push_str(text);
            }
        }
        #[cfg(windows)]
        {
            let text = match code {
                5 => Some("access denied; the file may be locked or read-only."), // ERROR_ACCESS_DENIED
                17 => Some("not same device; cross-filesystem rename."), // ERROR_NOT_SAME_DEVICE
                32 => Some("sharing violation; file is in use."), // ERROR_SHARING_VIOLATION
                33 => Some("lock violation; part of the file is locked."), // ERROR_LOCK_VIOLATION
                2 | 3 => Some("path not found; verify the directory exists."),
                80 => Some("already exists; temp name collision."), // ERROR_FILE_EXISTS
                112 => Some("insufficient disk space."), // ERROR_DISK_FULL
                19 => Some("write protected / read-only media."), // ERROR_WRITE_PROTECT
                206 => Some("filename or path too long (MAX_PATH exceeded)."),
                _ => None,
            };
            if let Some(text) = text {
                hint.push_str("; ");
                hint.push_str(text);
            }
        }
        hint.push_str(&format!(" [os code: {code}]"));
    } else {
        let text = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                Some("permission denied; check ownership and write permissions.")
            }
            io::ErrorKind::NotFound => Some("path not found; verify it exists."),
            io::ErrorKind::AlreadyExists => Some("already exists; remove or choose a unique name."),
            io::ErrorKind::ResourceBusy | io::ErrorKind::WouldBlock => {
                Some("busy; retry after the other writer finishes.")
            }
            _ => None,
        };
        if let Some(text) = text {
            hint.push_str("; ");
            hint.push_str(text);
        }
    }

    hint
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    format!("{} '{}': {}{}", op, path.display(), e, hint_for(e))
}

/// Adapter for anyhow::Result code.
/// Returns a closure suitable for `.map_err(...)` that converts io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Adapter for io::Result code. Keeps the original ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
