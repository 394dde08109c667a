//! `dprt-sim` — lockstep step loop for the exact and private regimes.
//!
//! # Step loop
//!
//! ```text
//! for tick in 0..horizon (then cool-off ticks, if enabled):
//!   ① Refresh — on refresh ticks, each regime rebuilds counts from its own
//!               vehicles, then latencies and path tables
//!               (both regimes on Rayon tasks with the `parallel` feature).
//!   ② Demand  — one Poisson draw shared by both regimes (zero in cool-off).
//!   ③ Spawn   — each trip becomes a vehicle in each regime, with path and
//!               ETA from that regime's current snapshot.
//!   ④ Advance — every active vehicle moves one step at true edge speed.
//!   ⑤ Reap    — completed vehicles move to each fleet's completed list.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Refreshes run on `rayon::join`; all-pairs rows in parallel. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dprt_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, Arc::new(topology), demand).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stats;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RegimeRun, Sim};
pub use stats::{Phase, RegimeStepStats, StepStats};
