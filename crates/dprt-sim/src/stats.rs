//! Per-step counters handed to observers.

use dprt_core::{Regime, Tick};

/// Whether a step belongs to the demand horizon or the cool-off tail.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Horizon,
    CoolOff,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Horizon => "horizon",
            Phase::CoolOff => "cool_off",
        }
    }
}

/// What happened to one regime during one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegimeStepStats {
    pub regime:          Regime,
    pub spawned:         u64,
    /// Trips dropped because no path existed.
    pub unreachable:     u64,
    /// Trips dropped because origin equals destination.
    pub same_vertex:     u64,
    /// Vehicles moved to the completed list this step.
    pub completed:       u64,
    /// Active vehicles after the step.
    pub active:          u64,
    pub total_completed: u64,
    pub refreshed:       bool,
}

impl RegimeStepStats {
    pub(crate) fn new(regime: Regime) -> Self {
        Self {
            regime,
            spawned: 0,
            unreachable: 0,
            same_vertex: 0,
            completed: 0,
            active: 0,
            total_completed: 0,
            refreshed: false,
        }
    }
}

/// Counters for one step across both regimes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepStats {
    pub tick:    Tick,
    pub phase:   Phase,
    /// Trips in the shared demand draw.
    pub demand:  u64,
    pub exact:   RegimeStepStats,
    pub private: RegimeStepStats,
}

impl StepStats {
    pub fn regime(&self, regime: Regime) -> &RegimeStepStats {
        match regime {
            Regime::Exact   => &self.exact,
            Regime::Private => &self.private,
        }
    }
}
