//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::parse_mode;
use crate::config::types::{Config, LogLevel};
use crate::random::Charset;

/// CLI wrapper for the durable_write library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Replace files atomically and durably"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, value_name = "LEVEL", help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<LogLevel>,

    /// Also append logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Append logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Total rename attempts while the target is locked by another process.
    #[arg(long, global = true, value_name = "N")]
    pub retry_attempts: Option<u32>,

    /// Wait between rename attempts, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Atomically replace TARGET with the bytes of --input (or stdin).
    Write {
        #[arg(value_name = "TARGET", value_hint = ValueHint::FilePath)]
        target: PathBuf,

        /// Read the payload from this file instead of stdin.
        #[arg(long, short = 'i', value_name = "FILE", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,

        /// Final permission bits in octal (default from config, 0644).
        #[arg(long, short = 'm', value_name = "OCTAL", value_parser = parse_mode)]
        mode: Option<u32>,

        /// Create missing parent directories first.
        #[arg(long, short = 'p')]
        parents: bool,
    },

    /// Print a random name drawn from the selected character subsets.
    Name {
        #[arg(long, short = 'n', default_value_t = 16)]
        length: usize,

        /// Comma-separated: lower, upper, digits, symbols, letters, all.
        #[arg(long, short = 'c', default_value = "letters")]
        charset: Charset,
    },

    /// Print where the config file is looked up, then exit.
    PrintConfig,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.clone()
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        if let Some(n) = self.retry_attempts {
            cfg.retry_attempts = n;
        }
        if let Some(ms) = self.retry_delay_ms {
            cfg.retry_delay = Duration::from_millis(ms);
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
