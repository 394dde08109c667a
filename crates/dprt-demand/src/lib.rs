//! `dprt-demand` — origin-destination demand and trip generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                             |
//! |---------------|------------------------------------------------------|
//! | [`table`]     | `DemandTable`, `OdDemand`                            |
//! | [`loader`]    | `DemandTable::load_csv`, `DemandTable::from_reader`  |
//! | [`generator`] | `DemandGenerator`, `DemandDraw`                      |
//! | [`error`]     | `DemandError`, `DemandResult<T>`                     |
//!
//! # Rate model
//!
//! Each OD row's volume is a daily total.  New trips per step on that row
//! are `Poisson(λ)` with
//!
//! ```text
//! λ = volume / 86 400 · delta_t · multiplier(scenario, calibration)
//! ```

pub mod error;
pub mod generator;
pub mod loader;
pub mod table;


pub use error::{DemandError, DemandResult};
pub use generator::{DemandDraw, DemandGenerator};
pub use table::{DemandTable, OdDemand, SECONDS_PER_DAY};
