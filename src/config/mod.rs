//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{Config, LogLevel};
pub use validate::parse_mode;
pub use xml::{create_template_config, load_config_from_xml, load_config_from_xml_path, load_or_init, LoadResult};

/// Defaults shared across submodules.
pub const DEFAULT_FILE_MODE: u32 = 0o644;
pub const MAX_RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(60);
