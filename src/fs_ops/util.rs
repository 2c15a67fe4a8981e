use std::io;
use std::path::{Path, PathBuf};

use crate::errors::AtomicWriteError;
use crate::platform;
use crate::random;

/// Length of the random suffix appended to the target's file name.
pub const TEMP_SUFFIX_LEN: usize = 10;
pub const TEMP_EXTENSION: &str = ".tmp";

/// Error text seen when another process holds the destination open. Locale
/// dependent; only consulted when the error carries no OS code.
const LOCK_MESSAGES: &[&str] = &["access is denied", "used by another process"];

/// Sibling temp path: `<dir>/<name><10 random letters>.tmp`.
///
/// Must stay in the target's directory: rename is only atomic within one filesystem.
pub fn temp_path_for(target: &Path) -> Result<PathBuf, AtomicWriteError> {
    let name = target
        .file_name()
        .ok_or_else(|| AtomicWriteError::InvalidTarget(target.to_path_buf()))?;
    let suffix = random::generate_alnum(TEMP_SUFFIX_LEN)?;

    let mut tmp_name = name.to_os_string();
    tmp_name.push(&suffix);
    tmp_name.push(TEMP_EXTENSION);
    Ok(target.with_file_name(tmp_name))
}

/// True when a rename failure looks like another process briefly holding the file.
///
/// Structured OS codes win; message matching is the fallback for errors that
/// carry none. The text match is fragile across platforms and locales.
pub fn is_transient_lock(e: &io::Error) -> bool {
    if let Some(code) = e.raw_os_error() {
        return platform::is_transient_lock_code(code);
    }
    if e.kind() == io::ErrorKind::ResourceBusy {
        return true;
    }
    let msg = e.to_string().to_ascii_lowercase();
    LOCK_MESSAGES.iter().any(|m| msg.contains(m))
}
