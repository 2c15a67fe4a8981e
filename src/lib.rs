//! Core library for `durable_write`.
//!
//! Replaces a file's contents so that readers observe either the complete old
//! contents or the complete new contents, never a mix, and the new contents are
//! on stable storage once the call returns. The temporary file used for the
//! swap is named with [`random::generate_alnum`].
//!
//! Modules:
//! - `fs_ops`: temp-file protocol, rename retry, JSON helpers
//! - `random`: secure name generation with a tiered entropy source
//! - `config`: XML config, default paths, validation
//! - `errors`: typed errors with stable exit codes
//! - `platform`: OS-specific open/chmod and lock-code classification

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod random;
pub mod shutdown;

pub use config::types::{Config, LogLevel};
pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use errors::{AtomicWriteError, ContractViolation, Step};
pub use fs_ops::{
    read_json, write_atomically, write_json_atomically, AtomicWriter, FileSystem, RetryPolicy,
    StdFs, WriteRequest,
};
pub use random::{generate, generate_alnum, random_in_range, Charset, TieredRng};
