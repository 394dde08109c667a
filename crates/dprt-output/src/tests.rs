//! Integration tests for dprt-output.

use std::sync::Arc;

use dprt_core::{EdgeId, Regime, SimConfig, Tick, VehicleId, VertexId};
use dprt_demand::DemandTable;
use dprt_network::{Topology, TopologyBuilder};
use dprt_vehicle::{EdgeKinematics, Vehicle};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Line 0 ↔ 1 ↔ 2, 100 m at 10 m/s per segment, capacity 5.
///
/// Edges: e0 = 0→1, e1 = 1→0, e2 = 1→2, e3 = 2→1.
fn line() -> Arc<Topology> {
    let mut b = TopologyBuilder::with_vertices(3);
    b.add_road(VertexId(0), VertexId(1), 100.0, 10.0, 5.0);
    b.add_road(VertexId(1), VertexId(2), 100.0, 10.0, 5.0);
    Arc::new(b.build().unwrap())
}

/// Every edge 100 m long at a fixed speed.
struct Uniform(f64);

impl EdgeKinematics for Uniform {
    fn edge_speed(&self, _edge: EdgeId) -> f64 {
        self.0
    }

    fn edge_length(&self, _edge: EdgeId) -> f64 {
        100.0
    }
}

/// A vehicle 0 → 2 driven to completion at `speed` with 10 s steps.
fn completed(id: u64, speed: f64, estimated_secs: f64) -> Vehicle {
    let topo = line();
    let mut v = Vehicle::new(
        VehicleId(id),
        VertexId(0),
        VertexId(2),
        vec![EdgeId(0), EdgeId(2)],
        Tick(3),
        estimated_secs,
        &topo,
    )
    .unwrap();
    while !v.is_completed() {
        v.advance(&Uniform(speed), 10.0);
    }
    v
}

fn demand(lambda: f64) -> DemandTable {
    DemandTable::from_rows(
        [(VertexId(0), VertexId(2), lambda * 86_400.0 / 10.0)],
        10.0,
        dprt_core::DemandScenario::Baseline,
        dprt_core::DemandCalibration::Daily,
    )
    .unwrap()
}

fn sim_config() -> SimConfig {
    SimConfig {
        horizon_steps: 12,
        cool_off: true,
        status_interval_steps: 0,
        ..SimConfig::default()
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Comparison ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report_tests {
    use super::*;
    use crate::report::{compare_trips, path_similarity, RunSummary};

    #[test]
    fn similarity_of_identical_and_disjoint_paths() {
        let a = [EdgeId(0), EdgeId(2)];
        assert_eq!(path_similarity(&a, &a), 1.0);
        assert_eq!(path_similarity(&a, &[EdgeId(1), EdgeId(3)]), 0.0);
        assert_eq!(path_similarity(&[], &[]), 1.0);
    }

    #[test]
    fn similarity_uses_longer_path() {
        let short = [EdgeId(0), EdgeId(2)];
        let long = [EdgeId(0), EdgeId(5), EdgeId(6), EdgeId(2)];
        assert_eq!(path_similarity(&short, &long), 0.5);
        assert_eq!(path_similarity(&long, &short), 0.5);
    }

    #[test]
    fn pairs_only_trips_completed_in_both() {
        let exact = [completed(1, 10.0, 25.0), completed(2, 10.0, 25.0)];
        let private = [completed(1, 5.0, 30.0)];
        let pairs = compare_trips(&exact, &private, 10.0);
        assert_eq!(pairs.len(), 1);

        let c = pairs[0];
        assert_eq!(c.vehicle_id, 1);
        assert_eq!((c.origin, c.destination), (0, 2));
        assert!(approx(c.travel_time_secs, 20.0));
        assert!(approx(c.private_travel_time_secs, 40.0));
        assert!(approx(c.estimation_error_secs, 5.0));
        assert!(approx(c.private_estimation_error_secs, -10.0));
        assert!(c.identical_path());
    }

    #[test]
    fn pairs_sorted_by_vehicle_id() {
        let exact = [completed(3, 10.0, 20.0), completed(1, 10.0, 20.0)];
        let private = [completed(1, 10.0, 20.0), completed(3, 10.0, 20.0)];
        let ids: Vec<u64> = compare_trips(&exact, &private, 10.0).iter().map(|c| c.vehicle_id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn pairs_many_trips_completed_out_of_order() {
        let exact: Vec<Vehicle> = (0..200).rev().map(|id| completed(id, 10.0, 20.0)).collect();
        // Private completed only the even ids, in a different order.
        let private: Vec<Vehicle> = (0..200).filter(|id| id % 2 == 0).map(|id| completed(id, 5.0, 20.0)).collect();
        let pairs = compare_trips(&exact, &private, 10.0);

        assert_eq!(pairs.len(), 100);
        assert!(pairs.iter().map(|c| c.vehicle_id).eq((0..200).step_by(2)));
        assert!(pairs.iter().all(|c| approx(c.private_travel_time_secs, 40.0)));
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(RunSummary::from_comparisons(&[]), RunSummary::default());
    }

    #[test]
    fn summary_aggregates() {
        let exact = [completed(1, 10.0, 25.0), completed(2, 10.0, 15.0)];
        let private = [completed(1, 5.0, 30.0), completed(2, 10.0, 20.0)];
        let s = RunSummary::from_comparisons(&compare_trips(&exact, &private, 10.0));

        assert_eq!(s.trips, 2);
        assert!(approx(s.total_travel_time_secs, 40.0));
        assert!(approx(s.total_private_travel_time_secs, 60.0));
        assert!(approx(s.mean_private_travel_time_secs, 30.0));
        assert!(approx(s.travel_time_increase, 0.5));
        // |+5| and |−5| exact, |−10| and |0| private.
        assert!(approx(s.mean_abs_estimation_error_secs, 5.0));
        assert!(approx(s.mean_abs_private_estimation_error_secs, 5.0));
        assert!(approx(s.identical_path_fraction, 1.0));
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;
    use crate::row::TripRow;

    #[test]
    fn trip_row_from_vehicle() {
        let row = TripRow::from_vehicle(Regime::Private, &completed(7, 5.0, 50.0), 10.0);
        assert_eq!(row.regime, Regime::Private);
        assert_eq!(row.vehicle_id, 7);
        assert_eq!(row.start_tick, 3);
        assert_eq!(row.finish_tick, 7);
        assert!(approx(row.travel_time_secs, 40.0));
        assert!(approx(row.error_secs, 10.0));
        assert_eq!(row.path_edges, 2);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::csv::CsvWriter;
    use crate::row::{StepSummaryRow, TripRow};
    use crate::writer::OutputWriter;

    const FILES: [&str; 6] = [
        "trips_exact.csv",
        "trips_private.csv",
        "trip_comparison.csv",
        "edge_utilization.csv",
        "edge_capacity.csv",
        "step_summaries.csv",
    ];

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn records(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        for file in FILES {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trips_private.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers[0], "vehicle_id");
        assert_eq!(headers.len(), 9);

        let mut rdr = csv::Reader::from_path(dir.path().join("edge_utilization.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["tick", "regime", "edge", "count", "observed_count", "latency", "routing_latency"]
        );
    }

    #[test]
    fn trips_split_by_regime() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = [
            TripRow::from_vehicle(Regime::Exact, &completed(0, 10.0, 20.0), 10.0),
            TripRow::from_vehicle(Regime::Private, &completed(0, 5.0, 20.0), 10.0),
            TripRow::from_vehicle(Regime::Exact, &completed(1, 10.0, 20.0), 10.0),
        ];
        w.write_trips(&rows).unwrap();
        w.finish().unwrap();

        let exact = records(&dir, "trips_exact.csv");
        let private = records(&dir, "trips_private.csv");
        assert_eq!(exact.len(), 2);
        assert_eq!(private.len(), 1);
        assert_eq!(&exact[1][0], "1");
        assert_eq!(&private[0][5], "40"); // travel_time_secs
    }

    #[test]
    fn step_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = StepSummaryRow {
            tick:              4,
            phase:             "cool_off",
            demand:            0,
            exact_spawned:     0,
            exact_completed:   2,
            exact_active:      1,
            private_spawned:   0,
            private_completed: 1,
            private_active:    2,
            unreachable:       0,
        };
        w.write_step_summary(&row).unwrap();
        w.finish().unwrap();

        let rows = records(&dir, "step_summaries.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[0][1], "cool_off");
        assert_eq!(&rows[0][7], "1");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use dprt_sim::SimBuilder;

    use super::*;
    use crate::{
        CsvWriter, EdgeCapacityRow, EdgeUtilizationRow, OutputError, OutputResult, OutputWriter,
        SimOutputObserver, StepSummaryRow, TripComparison, TripRow,
    };

    fn line_count(dir: &TempDir, file: &str) -> usize {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().count()
    }

    #[test]
    fn full_run_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = sim_config();
        let mut sim = SimBuilder::new(config.clone(), line(), demand(1.0)).build().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let steps = sim.clock.current_tick.0 as usize;
        assert_eq!(line_count(&dir, "step_summaries.csv"), steps);
        // Refresh every step, two regimes, four edges.
        assert_eq!(line_count(&dir, "edge_utilization.csv"), steps * 2 * 4);
        assert_eq!(line_count(&dir, "edge_capacity.csv"), 4);

        let exact = sim.exact().fleet.completed_count();
        assert!(exact > 0);
        assert_eq!(line_count(&dir, "trips_exact.csv"), exact);
        assert_eq!(line_count(&dir, "trips_private.csv"), sim.private().fleet.completed_count());
    }

    #[test]
    fn single_route_costs_nothing_under_noise() {
        let dir = tempfile::tempdir().unwrap();
        let config = sim_config();
        let mut sim = SimBuilder::new(config.clone(), line(), demand(1.0)).build().unwrap();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config);
        assert!(obs.summary().is_none());
        sim.run(&mut obs).unwrap();

        // One route per pair: both regimes drive identical paths at identical
        // true speeds, so only the ETAs can differ.
        let summary = *obs.summary().unwrap();
        assert_eq!(summary.trips, sim.exact().fleet.completed_count());
        assert!(approx(summary.identical_path_fraction, 1.0));
        assert!(approx(summary.travel_time_increase, 0.0));
        assert_eq!(line_count(&dir, "trip_comparison.csv"), summary.trips);
    }

    #[test]
    fn edge_utilization_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = sim_config();
        let mut sim = SimBuilder::new(config.clone(), line(), demand(0.5)).build().unwrap();
        let mut obs =
            SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &config).without_edge_utilization();
        sim.run(&mut obs).unwrap();
        assert_eq!(line_count(&dir, "edge_utilization.csv"), 0);
        assert_eq!(line_count(&dir, "edge_capacity.csv"), 4);
    }

    /// Fails every step-summary write.
    struct FailingWriter {
        finished: bool,
    }

    impl OutputWriter for FailingWriter {
        fn write_trips(&mut self, _rows: &[TripRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_edge_utilization(&mut self, _rows: &[EdgeUtilizationRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_edge_capacity(&mut self, _rows: &[EdgeCapacityRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_step_summary(&mut self, _row: &StepSummaryRow) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn write_comparisons(&mut self, _rows: &[TripComparison]) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_error_kept_and_run_continues() {
        let config = sim_config();
        let mut sim = SimBuilder::new(config.clone(), line(), demand(0.5)).build().unwrap();
        let mut obs = SimOutputObserver::new(FailingWriter { finished: false }, &config);
        sim.run(&mut obs).unwrap();

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
        assert!(obs.summary().is_some());
        assert!(obs.into_writer().finished);
    }
}

// ── SQLite backend (feature-gated) ────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::row::{EdgeCapacityRow, TripRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_trips_keyed_by_regime() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = [
            TripRow::from_vehicle(Regime::Exact, &completed(0, 10.0, 20.0), 10.0),
            TripRow::from_vehicle(Regime::Private, &completed(0, 5.0, 20.0), 10.0),
        ];
        w.write_trips(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let private: f64 = conn
            .query_row(
                "SELECT travel_time_secs FROM trips WHERE regime = 'private' AND vehicle_id = 0",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(private, 40.0);
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM trips", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn sqlite_capacity_rewrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = EdgeCapacityRow {
            edge:           0,
            tail:           0,
            head:           1,
            capacity:       5.0,
            critical_count: 5.0,
            base_latency:   10.0,
        };
        w.write_edge_capacity(&[row]).unwrap();
        w.write_edge_capacity(&[EdgeCapacityRow { capacity: 6.0, ..row }]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (count, capacity): (i64, f64) = conn
            .query_row("SELECT COUNT(*), MAX(capacity) FROM edge_capacity", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((count, capacity), (1, 6.0));
    }
}
