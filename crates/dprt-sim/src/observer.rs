//! Simulation observer trait for progress reporting and data collection.

use dprt_core::Tick;
use dprt_network::{NetworkState, RefreshReport};
use dprt_vehicle::Fleet;

use crate::StepStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: refresh counter
///
/// ```rust,ignore
/// struct Refreshes(u64);
///
/// impl SimObserver for Refreshes {
///     fn on_refresh(&mut self, _tick: Tick, _network: &NetworkState, _report: &RefreshReport) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_step_start(&mut self, _tick: Tick) {}

    /// Called once per regime after its latency refresh.
    ///
    /// The network state is read-only here; output writers can record edge
    /// counts and latencies without the sim knowing any output format.
    fn on_refresh(&mut self, _tick: Tick, _network: &NetworkState, _report: &RefreshReport) {}

    /// Called at the end of each step.
    fn on_step_end(&mut self, _stats: &StepStats) {}

    /// Called once after the final step, with both fleets.
    fn on_sim_end(&mut self, _final_tick: Tick, _exact: &Fleet, _private: &Fleet) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
