//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! tables `trips`, `trip_comparison`, `edge_utilization`, `edge_capacity`,
//! and `step_summaries`.  Trips from both regimes share one table, keyed by
//! `(regime, vehicle_id)`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{
    EdgeCapacityRow, EdgeUtilizationRow, OutputResult, StepSummaryRow, TripComparison, TripRow,
};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS trips (
                 regime           TEXT    NOT NULL,
                 vehicle_id       INTEGER NOT NULL,
                 origin           INTEGER NOT NULL,
                 destination      INTEGER NOT NULL,
                 start_tick       INTEGER NOT NULL,
                 finish_tick      INTEGER NOT NULL,
                 travel_time_secs REAL    NOT NULL,
                 estimated_secs   REAL    NOT NULL,
                 error_secs       REAL    NOT NULL,
                 path_edges       INTEGER NOT NULL,
                 PRIMARY KEY (regime, vehicle_id)
             );
             CREATE TABLE IF NOT EXISTS trip_comparison (
                 vehicle_id                    INTEGER PRIMARY KEY,
                 origin                        INTEGER NOT NULL,
                 destination                   INTEGER NOT NULL,
                 travel_time_secs              REAL    NOT NULL,
                 private_travel_time_secs      REAL    NOT NULL,
                 estimated_secs                REAL    NOT NULL,
                 private_estimated_secs        REAL    NOT NULL,
                 estimation_error_secs         REAL    NOT NULL,
                 private_estimation_error_secs REAL    NOT NULL,
                 path_similarity               REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS edge_utilization (
                 tick            INTEGER NOT NULL,
                 regime          TEXT    NOT NULL,
                 edge            INTEGER NOT NULL,
                 count           INTEGER NOT NULL,
                 observed_count  REAL    NOT NULL,
                 latency         REAL    NOT NULL,
                 routing_latency REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS edge_capacity (
                 edge           INTEGER PRIMARY KEY,
                 tail           INTEGER NOT NULL,
                 head           INTEGER NOT NULL,
                 capacity       REAL    NOT NULL,
                 critical_count REAL    NOT NULL,
                 base_latency   REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS step_summaries (
                 tick              INTEGER PRIMARY KEY,
                 phase             TEXT    NOT NULL,
                 demand            INTEGER NOT NULL,
                 exact_spawned     INTEGER NOT NULL,
                 exact_completed   INTEGER NOT NULL,
                 exact_active      INTEGER NOT NULL,
                 private_spawned   INTEGER NOT NULL,
                 private_completed INTEGER NOT NULL,
                 private_active    INTEGER NOT NULL,
                 unreachable       INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trips \
                 (regime, vehicle_id, origin, destination, start_tick, finish_tick, \
                  travel_time_secs, estimated_secs, error_secs, path_edges) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.regime.as_str(),
                    row.vehicle_id as i64,
                    row.origin,
                    row.destination,
                    row.start_tick as i64,
                    row.finish_tick as i64,
                    row.travel_time_secs,
                    row.estimated_secs,
                    row.error_secs,
                    row.path_edges,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_edge_utilization(&mut self, rows: &[EdgeUtilizationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO edge_utilization \
                 (tick, regime, edge, count, observed_count, latency, routing_latency) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.regime.as_str(),
                    row.edge,
                    row.count,
                    row.observed_count,
                    row.latency,
                    row.routing_latency,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_edge_capacity(&mut self, rows: &[EdgeCapacityRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO edge_capacity \
                 (edge, tail, head, capacity, critical_count, base_latency) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.edge,
                    row.tail,
                    row.head,
                    row.capacity,
                    row.critical_count,
                    row.base_latency,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO step_summaries \
             (tick, phase, demand, exact_spawned, exact_completed, exact_active, \
              private_spawned, private_completed, private_active, unreachable) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.tick as i64,
                row.phase,
                row.demand as i64,
                row.exact_spawned as i64,
                row.exact_completed as i64,
                row.exact_active as i64,
                row.private_spawned as i64,
                row.private_completed as i64,
                row.private_active as i64,
                row.unreachable as i64,
            ],
        )?;
        Ok(())
    }

    fn write_comparisons(&mut self, rows: &[TripComparison]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trip_comparison \
                 (vehicle_id, origin, destination, travel_time_secs, private_travel_time_secs, \
                  estimated_secs, private_estimated_secs, estimation_error_secs, \
                  private_estimation_error_secs, path_similarity) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.vehicle_id as i64,
                    row.origin,
                    row.destination,
                    row.travel_time_secs,
                    row.private_travel_time_secs,
                    row.estimated_secs,
                    row.private_estimated_secs,
                    row.estimation_error_secs,
                    row.private_estimation_error_secs,
                    row.path_similarity,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
