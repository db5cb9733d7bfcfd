//! Seeded random stream for level generation
//!
//! Seeds are human-readable strings so a layout can be named ("v1", "daily-42")
//! and reproduced exactly on any machine.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fold seed strings into one 64-bit seed (FNV-1a).
///
/// Each string is terminated with a 0xff byte so `["ab"]` and `["a", "b"]`
/// produce different seeds.
pub fn hash_seeds<S: AsRef<str>>(values: &[S]) -> u64 {
    let mut hash = FNV_OFFSET;
    for value in values {
        for byte in value.as_ref().bytes().chain(std::iter::once(0xff)) {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Deterministic integer generator
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: Pcg32,
}

impl SeededRng {
    pub fn from_seeds<S: AsRef<str>>(values: &[S]) -> Self {
        Self::from_u64(hash_seeds(values))
    }

    pub fn from_u64(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// The 64-bit seed this stream started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[min, max]`, both ends inclusive.
    ///
    /// An inverted range collapses to its midpoint instead of panicking.
    pub fn between(&mut self, min: i32, max: i32) -> i32 {
        if min > max {
            return midpoint(min, max);
        }
        self.inner.random_range(min..=max)
    }

    /// Like [`between`](Self::between) for ranges wider than `i32`
    pub fn between_u64(&mut self, min: u64, max: u64) -> u64 {
        if min > max {
            return min.midpoint(max);
        }
        self.inner.random_range(min..=max)
    }
}

fn midpoint(a: i32, b: i32) -> i32 {
    ((a as i64 + b as i64).div_euclid(2)) as i32
}
