//! Deterministic simulation-level RNG.
//!
//! Every random stream in a run is derived from `SimConfig::seed`:
//!
//!   demand stream  = SimRng::new(seed)
//!   noise stream_k = SimRng::derived(seed, k)
//!
//! so the demand realisation shared by both regimes never depends on how
//! many noise draws the DP regime consumed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp1, Poisson};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG with the draws the simulator needs.
///
/// Used only in single-threaded contexts; each consumer (demand generator,
/// each Laplace mechanism) owns its own instance.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream for `offset` from a root seed.
    pub fn derived(seed: u64, offset: u64) -> SimRng {
        SimRng(SmallRng::seed_from_u64(seed ^ offset.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Poisson draw with rate `lambda`.  Non-positive or non-finite rates
    /// yield 0 without consuming randomness.
    pub fn poisson(&mut self, lambda: f64) -> u32 {
        if !(lambda.is_finite() && lambda > 0.0) {
            return 0;
        }
        match Poisson::new(lambda) {
            Ok(dist) => {
                let k: f64 = dist.sample(&mut self.0);
                k.min(u32::MAX as f64) as u32
            }
            Err(_) => 0,
        }
    }

    /// Laplace draw centred at 0 with the given `scale` (b).
    ///
    /// Sampled as a symmetric exponential: `±b · Exp(1)`.
    pub fn laplace(&mut self, scale: f64) -> f64 {
        let magnitude: f64 = Exp1.sample(&mut self.0);
        if self.0.r#gen::<bool>() {
            scale * magnitude
        } else {
            -scale * magnitude
        }
    }
}
