//! CSV output backend.
//!
//! Creates six files in the configured output directory:
//! - `trips_exact.csv`, `trips_private.csv`
//! - `trip_comparison.csv`
//! - `edge_utilization.csv`, `edge_capacity.csv`
//! - `step_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use dprt_core::Regime;

use crate::writer::OutputWriter;
use crate::{
    EdgeCapacityRow, EdgeUtilizationRow, OutputResult, StepSummaryRow, TripComparison, TripRow,
};

const TRIP_HEADER: [&str; 9] = [
    "vehicle_id",
    "origin",
    "destination",
    "start_tick",
    "finish_tick",
    "travel_time_secs",
    "estimated_secs",
    "error_secs",
    "path_edges",
];

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    trips_exact:   Writer<File>,
    trips_private: Writer<File>,
    comparisons:   Writer<File>,
    utilization:   Writer<File>,
    capacity:      Writer<File>,
    summaries:     Writer<File>,
    finished:      bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trips_exact = Writer::from_path(dir.join("trips_exact.csv"))?;
        trips_exact.write_record(TRIP_HEADER)?;

        let mut trips_private = Writer::from_path(dir.join("trips_private.csv"))?;
        trips_private.write_record(TRIP_HEADER)?;

        let mut comparisons = Writer::from_path(dir.join("trip_comparison.csv"))?;
        comparisons.write_record([
            "vehicle_id",
            "origin",
            "destination",
            "travel_time_secs",
            "private_travel_time_secs",
            "estimated_secs",
            "private_estimated_secs",
            "estimation_error_secs",
            "private_estimation_error_secs",
            "path_similarity",
        ])?;

        let mut utilization = Writer::from_path(dir.join("edge_utilization.csv"))?;
        utilization.write_record([
            "tick",
            "regime",
            "edge",
            "count",
            "observed_count",
            "latency",
            "routing_latency",
        ])?;

        let mut capacity = Writer::from_path(dir.join("edge_capacity.csv"))?;
        capacity.write_record(["edge", "tail", "head", "capacity", "critical_count", "base_latency"])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record([
            "tick",
            "phase",
            "demand",
            "exact_spawned",
            "exact_completed",
            "exact_active",
            "private_spawned",
            "private_completed",
            "private_active",
            "unreachable",
        ])?;

        Ok(Self {
            trips_exact,
            trips_private,
            comparisons,
            utilization,
            capacity,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        for row in rows {
            let out = match row.regime {
                Regime::Exact   => &mut self.trips_exact,
                Regime::Private => &mut self.trips_private,
            };
            out.write_record(&[
                row.vehicle_id.to_string(),
                row.origin.to_string(),
                row.destination.to_string(),
                row.start_tick.to_string(),
                row.finish_tick.to_string(),
                row.travel_time_secs.to_string(),
                row.estimated_secs.to_string(),
                row.error_secs.to_string(),
                row.path_edges.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_edge_utilization(&mut self, rows: &[EdgeUtilizationRow]) -> OutputResult<()> {
        for row in rows {
            self.utilization.write_record(&[
                row.tick.to_string(),
                row.regime.as_str().to_string(),
                row.edge.to_string(),
                row.count.to_string(),
                row.observed_count.to_string(),
                row.latency.to_string(),
                row.routing_latency.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_edge_capacity(&mut self, rows: &[EdgeCapacityRow]) -> OutputResult<()> {
        for row in rows {
            self.capacity.write_record(&[
                row.edge.to_string(),
                row.tail.to_string(),
                row.head.to_string(),
                row.capacity.to_string(),
                row.critical_count.to_string(),
                row.base_latency.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.phase.to_string(),
            row.demand.to_string(),
            row.exact_spawned.to_string(),
            row.exact_completed.to_string(),
            row.exact_active.to_string(),
            row.private_spawned.to_string(),
            row.private_completed.to_string(),
            row.private_active.to_string(),
            row.unreachable.to_string(),
        ])?;
        Ok(())
    }

    fn write_comparisons(&mut self, rows: &[TripComparison]) -> OutputResult<()> {
        for row in rows {
            self.comparisons.write_record(&[
                row.vehicle_id.to_string(),
                row.origin.to_string(),
                row.destination.to_string(),
                row.travel_time_secs.to_string(),
                row.private_travel_time_secs.to_string(),
                row.estimated_secs.to_string(),
                row.private_estimated_secs.to_string(),
                row.estimation_error_secs.to_string(),
                row.private_estimation_error_secs.to_string(),
                row.path_similarity.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        for w in [
            &mut self.trips_exact,
            &mut self.trips_private,
            &mut self.comparisons,
            &mut self.utilization,
            &mut self.capacity,
            &mut self.summaries,
        ] {
            w.flush()?;
        }
        Ok(())
    }
}
