//! Filesystem operations: atomic durable writes and their helpers.

mod atomic;
mod helpers;
mod json;
mod primitives;
mod temp;
mod util;
mod writer;

pub use atomic::{RetryPolicy, DEFAULT_RENAME_ATTEMPTS, DEFAULT_RENAME_DELAY};
pub use helpers::{hint_for, io_error_with_help, io_error_with_help_io};
pub use json::{read_json, write_json_atomically};
pub use primitives::{FileSystem, StdFs};
pub use util::{is_transient_lock, temp_path_for, TEMP_EXTENSION, TEMP_SUFFIX_LEN};
pub use writer::{write_atomically, AtomicWriter, WriteRequest};
