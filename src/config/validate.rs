//! Config validation logic.
//! Rejects settings the writer cannot honor before any file is touched.

use anyhow::{bail, Result};
use tracing::debug;

use super::MAX_RETRY_DELAY;
use super::types::Config;

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            bail!("retry_attempts must be at least 1");
        }
        if self.retry_delay > MAX_RETRY_DELAY {
            bail!(
                "retry_delay of {} ms exceeds the {} s maximum",
                self.retry_delay.as_millis(),
                MAX_RETRY_DELAY.as_secs()
            );
        }
        if self.default_mode > 0o7777 {
            bail!("default_mode {:o} is not a valid permission mode", self.default_mode);
        }

        debug!(
            attempts = self.retry_attempts,
            delay_ms = self.retry_delay.as_millis() as u64,
            mode = %format!("{:o}", self.default_mode),
            "Config validated"
        );
        Ok(())
    }
}

/// Parse an octal permission string such as `644`, `0644` or `0o644`.
pub fn parse_mode(s: &str) -> Result<u32, String> {
    let t = s.trim();
    let digits = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")).unwrap_or(t);
    let mode = u32::from_str_radix(digits, 8).map_err(|_| format!("invalid octal mode: '{s}'"))?;
    if mode > 0o7777 {
        return Err(format!("mode out of range: '{s}'"));
    }
    Ok(mode)
}
