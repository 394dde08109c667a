//! `dprt-core` — foundational types for the `dprt` traffic-privacy simulator.
//!
//! This crate is a dependency of every other `dprt-*` crate.  It has no
//! `dprt-*` dependencies and only `rand`, `rand_distr`, and `thiserror`
//! externally (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`ids`]        | `VertexId`, `EdgeId`, `VehicleId`                        |
//! | [`time`]       | `Tick`, `StepClock`                                      |
//! | [`regime`]     | `Regime` (exact vs. private view)                        |
//! | [`scenario`]   | `DemandScenario`, `CapacityScenario`, `DemandCalibration`|
//! | [`config`]     | `SimConfig`, `LatencyModelKind`                          |
//! | [`rng`]        | `SimRng` (seeded, Poisson and Laplace draws)             |
//! | [`error`]      | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, scenarios, config.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod regime;
pub mod rng;
pub mod scenario;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{LatencyModelKind, SimConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, VehicleId, VertexId};
pub use regime::Regime;
pub use rng::SimRng;
pub use scenario::{CapacityScenario, DemandCalibration, DemandScenario};
pub use time::{StepClock, Tick};
