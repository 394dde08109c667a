//! `dprt-output` — simulation output writers and exact-vs-private comparison.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                 |
//! |-----------|---------|---------------------------------------------------------------|
//! | *(none)*  | CSV     | `trips_{exact,private}.csv`, `trip_comparison.csv`,            |
//! |           |         | `edge_utilization.csv`, `edge_capacity.csv`, `step_summaries.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                   |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `dprt_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dprt_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { log::error!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod report;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use report::{compare_trips, path_similarity, RunSummary, TripComparison};
pub use row::{EdgeCapacityRow, EdgeUtilizationRow, StepSummaryRow, TripRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
