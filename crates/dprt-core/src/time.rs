//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter.  Each tick covers
//! `delta_t_secs` simulated seconds:
//!
//!   elapsed_secs = tick * delta_t_secs
//!
//! Vehicle start/finish times are recorded in ticks; travel times in seconds
//! are derived through the clock.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Steps elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `true` if this tick lands on a multiple of `every`; `false` when `every` is 0.
    #[inline]
    pub fn is_multiple_of(self, every: u64) -> bool {
        every != 0 && self.0 % every == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts between ticks and seconds.
#[derive(Clone, Debug)]
pub struct StepClock {
    /// Simulated seconds per step.
    pub delta_t_secs: f64,
    /// The current tick, advanced once per step.
    pub current_tick: Tick,
}

impl StepClock {
    pub fn new(delta_t_secs: f64) -> Self {
        Self { delta_t_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.delta_t_secs
    }

    /// Seconds represented by `steps` ticks.
    #[inline]
    pub fn secs_for_steps(&self, steps: u64) -> f64 {
        steps as f64 * self.delta_t_secs
    }

    /// How many steps span `secs` seconds (rounds up).
    #[inline]
    pub fn steps_for_secs(&self, secs: f64) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        (secs / self.delta_t_secs).ceil() as u64
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} s)", self.current_tick, self.elapsed_secs())
    }
}
