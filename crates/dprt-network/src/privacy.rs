//! Count observation strategies: exact, or Laplace-noised.
//!
//! The private regime observes each edge count as
//!
//! ```text
//! noisy[e] = max(0, count[e] + Laplace(0, 1/ε))
//! ```
//!
//! with one independent draw per edge per refresh.  Composition across
//! refreshes is not accounted for.

use dprt_core::SimRng;

use crate::{NetworkError, NetworkResult};

/// Laplace mechanism with its own seeded noise stream.
#[derive(Clone, Debug)]
pub struct LaplaceMechanism {
    epsilon: f64,
    rng:     SimRng,
}

impl LaplaceMechanism {
    pub fn new(epsilon: f64, rng: SimRng) -> NetworkResult<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(NetworkError::Privacy(format!("epsilon must be positive, got {epsilon}")));
        }
        Ok(Self { epsilon, rng })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Noise scale `b = 1/ε` (count sensitivity 1).
    pub fn scale(&self) -> f64 {
        1.0 / self.epsilon
    }

    /// Noisy copy of `counts`, clamped at zero.
    pub fn perturb(&mut self, counts: &[f64]) -> Vec<f64> {
        let scale = self.scale();
        counts
            .iter()
            .map(|&c| (c + self.rng.laplace(scale)).max(0.0))
            .collect()
    }
}

/// How a network state turns true edge counts into the counts it routes on.
#[derive(Clone, Debug)]
pub enum CountObservation {
    /// Route on the true counts.
    Exact,
    /// Route on Laplace-noised counts.
    Noisy(LaplaceMechanism),
}

impl CountObservation {
    /// Laplace observation with a fresh mechanism.
    pub fn laplace(epsilon: f64, rng: SimRng) -> NetworkResult<Self> {
        LaplaceMechanism::new(epsilon, rng).map(CountObservation::Noisy)
    }

    pub fn is_noisy(&self) -> bool {
        matches!(self, CountObservation::Noisy(_))
    }

    /// Observed counts, or `None` when the true counts are used unchanged.
    pub fn observe(&mut self, counts: &[f64]) -> Option<Vec<f64>> {
        match self {
            CountObservation::Exact => None,
            CountObservation::Noisy(mechanism) => Some(mechanism.perturb(counts)),
        }
    }
}
