//! `dprt-vehicle` — vehicles moving along committed paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`vehicle`] | `Vehicle`, `VehicleStatus`, `EdgeKinematics`              |
//! | [`fleet`]   | `Fleet` — active/completed populations for one regime     |
//! | [`error`]   | `VehicleError`, `VehicleResult<T>`                        |
//!
//! # Movement model
//!
//! A vehicle is created with a shortest path and an ETA taken from its
//! regime's network snapshot at that instant.  Each step it advances its
//! fractional progress on the current edge by
//! `delta_t · speed(edge) / length(edge)`, where the speed comes from the
//! *true* congestion on the edge.  Reaching the end of an edge drops any
//! overshoot and moves the vehicle to the start of the next edge; leaving the
//! last edge completes the trip.  Paths are never changed after creation.

pub mod error;
pub mod fleet;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use error::{VehicleError, VehicleResult};
pub use fleet::{Fleet, Spawn};
pub use vehicle::{EdgeKinematics, PROGRESS_EPS, Vehicle, VehicleStatus};
