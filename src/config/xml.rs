//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a secure template if missing (unless DURABLE_WRITE_CONFIG is set).
//!
//! Notes:
//! - Unknown XML fields are a hard error to surface misconfigurations early.
//! - The template itself is written with the crate's atomic writer (mode 0600).

use anyhow::{bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use quick_xml::escape::escape;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
use super::types::{Config, LogLevel};
use super::validate::parse_mode;
use crate::fs_ops::write_atomically;
use crate::platform::set_dir_mode_0700;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    /// Octal, e.g. `0644`
    default_mode: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    retry_attempts: Option<u64>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    retry_delay_ms: Option<u64>,
}

/// Outcome of locating the config file on startup.
#[derive(Debug)]
pub enum LoadResult {
    Loaded(Config),
    /// No file existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
    /// No config path could be determined; built-in defaults apply.
    Defaults,
}

// Custom deserializer that trims surrounding whitespace for optional u64.
// Empty elements count as absent; anything else must be a valid number.
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match non_empty(opt.as_deref()) {
        None => Ok(None),
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{s}'"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.default_mode.as_deref()) {
        cfg.default_mode = parse_mode(s).map_err(anyhow::Error::msg)?;
    }
    if let Some(n) = parsed.retry_attempts {
        cfg.retry_attempts = u32::try_from(n).context("retry_attempts out of range")?;
    }
    if let Some(ms) = parsed.retry_delay_ms {
        cfg.retry_delay = Duration::from_millis(ms);
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg = xml_to_config(parsed).with_context(|| format!("config xml '{}'", path.display()))?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

/// Load the config from `$DURABLE_WRITE_CONFIG` or the default path.
/// Ok(None) when the file does not exist.
pub fn load_config_from_xml() -> Result<Option<Config>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    load_config_from_xml_path(&path).map(Some)
}

/// Load the config, writing a template at the default location on first run.
/// An explicit `$DURABLE_WRITE_CONFIG` must point to an existing file.
pub fn load_or_init() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV).is_some_and(|v| !v.is_empty());
    let Some(path) = default_config_path() else {
        return Ok(LoadResult::Defaults);
    };

    if path.exists() {
        return load_config_from_xml_path(&path).map(LoadResult::Loaded);
    }
    if explicit {
        bail!("{CONFIG_ENV} points to a missing file: {}", path.display());
    }

    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(path))
}

/// Create the default template config file and parent directory (0700 / 0600).
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/durable_write.log".into());
    let content = render_template(&suggested_log);

    write_atomically(path, content.as_bytes(), 0o600)
        .with_context(|| format!("write template config '{}'", path.display()))?;

    info!("Created template config at {}", path.display());
    Ok(())
}

/// Template body with built-in defaults; `log_file` is XML-escaped.
fn render_template(suggested_log: &str) -> String {
    let defaults = Config::default();
    format!(
        "<!--\n  durable_write configuration (XML)\n\n  Fields:\n    log_level       -> quiet | normal | info | debug\n    log_file        -> path to log file (optional; stdout/stderr still used)\n    default_mode    -> octal permission bits for written files when --mode is absent\n    retry_attempts  -> total rename attempts while the target is locked (>= 1)\n    retry_delay_ms  -> wait between rename attempts in milliseconds\n\n  CLI flags override XML values.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <default_mode>{:04o}</default_mode>\n  <retry_attempts>{}</retry_attempts>\n  <retry_delay_ms>{}</retry_delay_ms>\n</config>\n",
        escape(suggested_log),
        defaults.default_mode,
        defaults.retry_attempts,
        defaults.retry_delay.as_millis()
    )
}
