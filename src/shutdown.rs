//! Process-wide shutdown flag, set by the ctrlc handler on SIGINT/SIGTERM.
//!
//! The writer consults it exactly once, before creating its temp file. Once a
//! temp file exists the write runs to commit or cleanup regardless of the flag,
//! so an interrupt never leaves a half-finished write behind.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent, signal-safe).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

