//! Atomic rename with bounded retry.
//! - The rename is the single commit point of a write.
//! - Transient lock errors wait a fixed delay and retry up to `RetryPolicy::attempts`.
//! - The destination directory is not fsynced; rename durability is best-effort.

use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{trace, warn};

use super::primitives::FileSystem;
use super::util::is_transient_lock;
use crate::errors::{AtomicWriteError, Step};

pub const DEFAULT_RENAME_ATTEMPTS: u32 = 3;
pub const DEFAULT_RENAME_DELAY: Duration = Duration::from_millis(200);

/// How often, and how patiently, a locked rename is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RENAME_ATTEMPTS,
            delay: DEFAULT_RENAME_DELAY,
        }
    }
}

impl RetryPolicy {
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Rename `from` onto `to`, retrying transient lock errors.
/// Returns the number of attempts used.
pub(crate) fn rename_with_retry<F: FileSystem>(
    fs: &F,
    from: &Path,
    to: &Path,
    policy: RetryPolicy,
) -> Result<u32, AtomicWriteError> {
    let max = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match fs.rename(from, to) {
            Ok(()) => {
                trace!(from = %from.display(), to = %to.display(), attempt, "rename committed");
                return Ok(attempt);
            }
            Err(e) if is_transient_lock(&e) => {
                if attempt >= max {
                    warn!(to = %to.display(), attempts = attempt, error = %e, "rename still locked; giving up");
                    return Err(AtomicWriteError::TransientLock {
                        from: from.to_path_buf(),
                        to: to.to_path_buf(),
                        attempts: attempt,
                        source: e,
                    });
                }
                warn!(
                    to = %to.display(),
                    attempt,
                    max,
                    delay_ms = policy.delay.as_millis() as u64,
                    error = %e,
                    "rename blocked by another process; retrying"
                );
                thread::sleep(policy.delay);
                attempt += 1;
            }
            Err(e) => return Err(AtomicWriteError::resource(Step::Rename, to, e)),
        }
    }
}
