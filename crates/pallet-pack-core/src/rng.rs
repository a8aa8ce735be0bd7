//! Seeded randomness for the Extreme-Points jitter:
//! a run with the same seed produces the same jitter sequence, keeping
//! otherwise-deterministic packing reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

#[derive(Debug, Clone)]
pub struct Jitter {
    rng: Pcg64,
}

impl Jitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// A jitter multiplier in `[lo, hi]`, used by Extreme-Points' sort key.
    pub fn factor(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..=hi)
    }
}
