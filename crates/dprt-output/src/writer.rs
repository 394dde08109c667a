//! The `OutputWriter` trait implemented by all backend writers.

use crate::{
    EdgeCapacityRow, EdgeUtilizationRow, OutputResult, StepSummaryRow, TripComparison, TripRow,
};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write completed trips.  Rows may mix regimes.
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()>;

    /// Write one refresh worth of per-edge counts and latencies.
    fn write_edge_utilization(&mut self, rows: &[EdgeUtilizationRow]) -> OutputResult<()>;

    /// Write the static per-edge capacity listing.
    fn write_edge_capacity(&mut self, rows: &[EdgeCapacityRow]) -> OutputResult<()>;

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write exact-vs-private trip pairs.
    fn write_comparisons(&mut self, rows: &[TripComparison]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
