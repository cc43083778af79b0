//! RNG module - seeded random stream for piece generation
//!
//! A single [`PieceRng`] is created per session and threaded through every
//! generator refill. The seed is recorded even when it was drawn from entropy,
//! so any session can be replayed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG (ChaCha8) that remembers its seed
#[derive(Debug, Clone)]
pub struct PieceRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl PieceRng {
    /// Create a new RNG with the given seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded from `seed`, or from entropy when absent
    #[must_use]
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    /// The seed this stream started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random index in `0..len`
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
