//! Uniform integer draws from a pluggable random source.
//!
//! Any [`RngCore`] can back a random rule: the OS generator in production,
//! a seeded or scripted generator in tests.

use crate::error::{BatchError, BatchResult};
use rand_core::RngCore;

/// Draws a value uniformly from the closed interval `[min, max]`.
///
/// Uses rejection sampling so every value in the interval is equally
/// likely regardless of the interval's size.
pub fn draw_inclusive<R: RngCore + ?Sized>(rng: &mut R, min: i64, max: i64) -> BatchResult<i64> {
    if min > max {
        return Err(BatchError::InvalidRange { min, max });
    }

    // Width of the interval minus one; fits in u64 for any i64 bounds.
    let span = (max as i128 - min as i128) as u64;
    if span == u64::MAX {
        return Ok(rng.next_u64() as i64);
    }

    let range = span + 1;
    // Lowest value at which `v % range` becomes unbiased.
    let threshold = range.wrapping_neg() % range;
    loop {
        let v = rng.next_u64();
        if v >= threshold {
            let offset = v % range;
            return Ok((min as i128 + offset as i128) as i64);
        }
    }
}
