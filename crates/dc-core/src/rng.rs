//! Deterministic simulation RNG.
//!
//! The warehouse runs single-threaded, so one seeded `SmallRng` drives every
//! random draw (order sizes, inbound pallet types).  The same seed and
//! config always reproduce the same run.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform integer in the inclusive range `[lo, hi]`.
    #[inline]
    pub fn uniform_discr(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// Draw an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when the weights are empty, all zero, or not finite.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.0))
    }
}
