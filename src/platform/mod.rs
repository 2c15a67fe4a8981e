//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the writer and config layers can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    apply_mode, create_temp_exclusive, is_transient_lock_code, open_log_file_secure_append,
    set_dir_mode_0700,
};

#[cfg(not(unix))]
pub use windows::{
    apply_mode, create_temp_exclusive, is_transient_lock_code, open_log_file_secure_append,
    set_dir_mode_0700,
};
