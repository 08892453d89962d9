//! Injectable randomness.
//!
//! Both the cache refresh decision and the recommendation sample draw from a
//! [`RandomSource`]. Production code uses [`ThreadRandom`]; tests inject
//! [`SeededRandom`] or their own scripted source to force hit/miss outcomes
//! without statistical runs.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random draws used by the cache and the selector.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0, 1)`.
    fn unit(&self) -> f64;

    /// `amount` distinct indices drawn uniformly from `0..length`.
    ///
    /// Callers guarantee `amount <= length`.
    fn sample_indices(&self, length: usize, amount: usize) -> Vec<usize>;
}

/// Thread-local RNG, the production source.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }

    fn sample_indices(&self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut rand::rng(), length, amount).into_vec()
    }
}

/// Deterministic source seeded once; reproducible across runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random::<f64>()
    }

    fn sample_indices(&self, length: usize, amount: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rand::seq::index::sample(&mut *rng, length, amount).into_vec()
    }
}
