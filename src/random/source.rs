//! Two-tier random source.
//!
//! Every draw goes to the strong (fallible) source first. When that source
//! reports an error the draw is served by a lazily-seeded `SmallRng` instead,
//! and the fallback is counted. Callers only ever see an infallible `RngCore`.

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng, TryRngCore};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Strong source with a non-cryptographic fallback.
pub struct TieredRng<S> {
    strong: S,
    weak: Option<SmallRng>,
    fallbacks: u64,
}

impl TieredRng<OsRng> {
    /// OS entropy backed by the fallback PRNG.
    pub fn os() -> Self {
        Self::new(OsRng)
    }
}

impl<S: TryRngCore> TieredRng<S> {
    pub fn new(strong: S) -> Self {
        Self {
            strong,
            weak: None,
            fallbacks: 0,
        }
    }

    /// Number of draws served by the fallback source so far.
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    fn fall_back<E: Display>(&mut self, err: &E) -> &mut SmallRng {
        self.fallbacks += 1;
        if self.fallbacks == 1 {
            warn!(error = %err, "secure random source failed; using non-cryptographic fallback");
        } else {
            debug!(error = %err, fallbacks = self.fallbacks, "secure random source still failing");
        }
        self.weak.get_or_insert_with(seed_weak)
    }
}

impl<S: TryRngCore> RngCore for TieredRng<S> {
    fn next_u32(&mut self) -> u32 {
        match self.strong.try_next_u32() {
            Ok(v) => v,
            Err(e) => self.fall_back(&e).next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self.strong.try_next_u64() {
            Ok(v) => v,
            Err(e) => self.fall_back(&e).next_u64(),
        }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        if let Err(e) = self.strong.try_fill_bytes(dst) {
            self.fall_back(&e).fill_bytes(dst);
        }
    }
}

/// Seed for the fallback PRNG without touching OS entropy: wall clock, pid and a
/// process-wide counter so two fallbacks in the same nanosecond still differ.
fn seed_weak() -> SmallRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let pid = u64::from(std::process::id());
    let seq = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    SmallRng::seed_from_u64(nanos ^ pid.rotate_left(32) ^ seq.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
