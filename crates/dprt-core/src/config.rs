//! Top-level simulation configuration.

use crate::{CapacityScenario, CoreError, CoreResult, DemandCalibration, DemandScenario, Tick};

/// Which congestion formula turns edge counts into latency.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LatencyModelKind {
    /// `base · (1 + 0.15 · (count / capacity)^4)`.
    #[default]
    Quartic,
    /// `base · (1 + 0.15 · x*(ŷ)^4)` via the counts-to-flow table.
    Table,
    /// `base` up to capacity, then `base + alpha · (count − capacity)^4`.
    Overflow { alpha: f64 },
}

/// Configuration for one simulation run (both regimes).
///
/// Typically deserialized from JSON by the application and validated with
/// [`SimConfig::validate`] before building the simulation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per step.
    pub delta_t_secs: f64,

    /// Steps with active demand.
    pub horizon_steps: u64,

    /// Seconds between latency refreshes.  Must be a positive multiple of
    /// `delta_t_secs`; the refresh happens every
    /// `refresh_interval_secs / delta_t_secs` steps.
    pub refresh_interval_secs: f64,

    /// After the horizon, keep stepping with zero demand until both fleets
    /// are empty.
    pub cool_off: bool,

    /// Upper bound on cool-off steps (guards against vehicles stuck on a
    /// zero-speed edge).
    pub max_cool_off_steps: u64,

    /// Master seed.  Identical seed and inputs give identical runs.
    pub seed: u64,

    /// Privacy parameter for the DP regime's Laplace mechanism.
    pub epsilon: f64,

    pub demand_scenario: DemandScenario,
    pub demand_calibration: DemandCalibration,
    pub capacity_scenario: CapacityScenario,
    pub latency_model: LatencyModelKind,

    /// Emit a status line every N steps (0 disables).
    pub status_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            delta_t_secs:          10.0,
            horizon_steps:         1_000,
            refresh_interval_secs: 10.0,
            cool_off:              false,
            max_cool_off_steps:    10_000,
            seed:                  1729,
            epsilon:               0.01,
            demand_scenario:       DemandScenario::Baseline,
            demand_calibration:    DemandCalibration::Daily,
            capacity_scenario:     CapacityScenario::Baseline,
            latency_model:         LatencyModelKind::Quartic,
            status_interval_steps: 600,
        }
    }
}

impl SimConfig {
    /// The tick at which demand stops (exclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.horizon_steps)
    }

    /// Steps between latency refreshes.
    ///
    /// Only meaningful after [`validate`](Self::validate) has succeeded.
    pub fn refresh_steps(&self) -> u64 {
        ((self.refresh_interval_secs / self.delta_t_secs).round() as u64).max(1)
    }

    /// `true` if `tick` starts a refresh cycle (tick 0 always does).
    #[inline]
    pub fn is_refresh_tick(&self, tick: Tick) -> bool {
        tick.is_multiple_of(self.refresh_steps())
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(self.delta_t_secs.is_finite() && self.delta_t_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "delta_t_secs must be positive, got {}",
                self.delta_t_secs
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(CoreError::Config(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        let ratio = self.refresh_interval_secs / self.delta_t_secs;
        if !(ratio.is_finite() && ratio >= 1.0 && (ratio - ratio.round()).abs() < 1e-9) {
            return Err(CoreError::Config(format!(
                "refresh_interval_secs ({}) must be a positive multiple of delta_t_secs ({})",
                self.refresh_interval_secs, self.delta_t_secs
            )));
        }
        if let LatencyModelKind::Overflow { alpha } = self.latency_model {
            if !(alpha.is_finite() && alpha >= 0.0) {
                return Err(CoreError::Config(format!(
                    "overflow alpha must be non-negative, got {alpha}"
                )));
            }
        }
        Ok(())
    }
}
