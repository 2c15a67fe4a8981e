//! Collision-resistant random names.
//!
//! Draws come from OS entropy through [`TieredRng`]; if the OS source fails for a
//! draw, that draw is served by a non-cryptographic PRNG. The names are used for
//! temp-file uniqueness, not secrets, so availability wins over strictness.

mod charset;
mod source;

pub use charset::Charset;
pub use source::TieredRng;

use rand::{Rng, TryRngCore};

use crate::errors::ContractViolation;

/// Random string of exactly `length` characters drawn uniformly from `charset`.
pub fn generate(charset: Charset, length: usize) -> Result<String, ContractViolation> {
    generate_with(&mut TieredRng::os(), charset, length)
}

/// Same as [`generate`] with a caller-supplied source.
pub fn generate_with<S: TryRngCore>(
    rng: &mut TieredRng<S>,
    charset: Charset,
    length: usize,
) -> Result<String, ContractViolation> {
    if length == 0 {
        return Err(ContractViolation::ZeroLength);
    }
    let pool = charset.pool();
    if pool.is_empty() {
        return Err(ContractViolation::EmptyPool);
    }

    let name: String = (0..length)
        .map(|_| char::from(pool[rng.random_range(0..pool.len())]))
        .collect();
    Ok(name)
}

/// Letters only (a-z, A-Z); safe in filenames on every platform without escaping.
pub fn generate_alnum(length: usize) -> Result<String, ContractViolation> {
    generate(Charset::LETTERS, length)
}

/// Uniform integer in the inclusive range between `a` and `b` (order-insensitive).
pub fn random_in_range(a: i64, b: i64) -> i64 {
    random_in_range_with(&mut TieredRng::os(), a, b)
}

pub fn random_in_range_with<S: TryRngCore>(rng: &mut TieredRng<S>, a: i64, b: i64) -> i64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi)
}
