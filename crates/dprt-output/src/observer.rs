//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use dprt_core::{Regime, SimConfig, Tick};
use dprt_network::{NetworkState, RefreshReport};
use dprt_sim::{SimObserver, StepStats};
use dprt_vehicle::Fleet;

use crate::report::{compare_trips, RunSummary};
use crate::row::{EdgeCapacityRow, EdgeUtilizationRow, StepSummaryRow, TripRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes trips, comparisons, per-refresh edge
/// utilization, and step summaries to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:           W,
    delta_t_secs:     f64,
    edge_utilization: bool,
    capacity_written: bool,
    summary:          Option<RunSummary>,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for tick-to-second
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            delta_t_secs:     config.delta_t_secs,
            edge_utilization: true,
            capacity_written: false,
            summary:          None,
            last_error:       None,
        }
    }

    /// Skip per-refresh edge rows.  On large networks they dominate output
    /// size.
    pub fn without_edge_utilization(mut self) -> Self {
        self.edge_utilization = false;
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Run-level comparison, available once the sim has ended.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::error!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }

    fn write_fleet(&mut self, regime: Regime, fleet: &Fleet) -> OutputResult<()> {
        let rows: Vec<TripRow> = fleet
            .completed()
            .iter()
            .map(|v| TripRow::from_vehicle(regime, v, self.delta_t_secs))
            .collect();
        self.writer.write_trips(&rows)
    }

    fn write_end(&mut self, exact: &Fleet, private: &Fleet) -> OutputResult<()> {
        self.write_fleet(Regime::Exact, exact)?;
        self.write_fleet(Regime::Private, private)?;

        let comparisons = compare_trips(exact.completed(), private.completed(), self.delta_t_secs);
        self.writer.write_comparisons(&comparisons)?;

        let summary = RunSummary::from_comparisons(&comparisons);
        log::info!(
            "compared {} trips: mean {:.1}s exact vs {:.1}s private ({:+.2}%), \
             path similarity {:.3}",
            summary.trips,
            summary.mean_travel_time_secs,
            summary.mean_private_travel_time_secs,
            summary.travel_time_increase * 100.0,
            summary.mean_path_similarity,
        );
        self.summary = Some(summary);
        Ok(())
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_refresh(&mut self, tick: Tick, network: &NetworkState, _report: &RefreshReport) {
        if !self.capacity_written {
            self.capacity_written = true;
            let rows = EdgeCapacityRow::listing(network);
            let result = self.writer.write_edge_capacity(&rows);
            self.store_err(result);
        }
        if self.edge_utilization {
            let rows = EdgeUtilizationRow::snapshot(tick, network);
            let result = self.writer.write_edge_utilization(&rows);
            self.store_err(result);
        }
    }

    fn on_step_end(&mut self, stats: &StepStats) {
        let row = StepSummaryRow::from(stats);
        let result = self.writer.write_step_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick, exact: &Fleet, private: &Fleet) {
        let result = self.write_end(exact, private);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
