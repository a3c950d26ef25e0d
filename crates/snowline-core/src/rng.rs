//! Deterministic randomness for curve and network generation.
//!
//! Wraps `ChaCha8Rng` so identical seeds reproduce identical geometry on every
//! platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Seedable random source injected into every randomized network operation.
#[derive(Debug, Clone)]
pub struct TrackRng(pub ChaCha8Rng);

impl Default for TrackRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl TrackRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.0.gen::<f32>()
    }

    /// Uniform float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..max)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Either 1.0 or -1.0
    pub fn sign(&mut self) -> f32 {
        if self.0.gen::<bool>() {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniform index in [0, len); 0 for an empty range
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.gen_range(0..len)
    }
}
