//! Counts-to-flow lookup table.
//!
//! Tabulates the inverse of the strictly increasing congestion polynomial
//!
//! ```text
//! f(x) = x + 0.15 · x^5
//! ```
//!
//! at `y = 0, dy, 2·dy, … < y_max`, so the table latency model can map a
//! normalised edge count `ŷ` to a flow `x*(ŷ)` with one index computation.
//!
//! # Solver
//!
//! Samples are solved in ascending `y`.  Each search starts from the previous
//! solution, which is a lower bound because `f` is increasing, and steps by
//! `dy` until `f(x) ≥ y`.  That bracket is then narrowed from above, keeping
//! the lower end, until `0 ≤ y − f(x*) < dy`.  The sweep is amortised O(1)
//! steps per sample; the narrowing adds `log2(f'(x))` iterations, which is
//! what keeps the residual inside `dy` once `f' > 1`.
//!
//! # Indexing
//!
//! `lookup(ŷ)` truncates `ŷ / dy` to the sample below.  The default
//! `dy = 0.001` makes that `⌊ŷ · 1000⌋`; the step and the index scale are the
//! same number and cannot be chosen independently.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{NetworkError, NetworkResult};

/// Coefficient of the quintic term (the BPR 0.15).
pub const FLOW_COEFFICIENT: f64 = 0.15;

/// Slack added before truncating `ŷ / dy`, so exact multiples of `dy` that
/// land a hair below the integer after division still hit their sample.
const INDEX_SLACK: f64 = 1e-9;

/// `f(x) = x + 0.15 · x^5`.
#[inline]
pub fn congestion_polynomial(x: f64) -> f64 {
    x + FLOW_COEFFICIENT * x.powi(5)
}

/// Result of a table lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowLookup {
    pub x_star: f64,
    pub index:  usize,
    /// `true` if `ŷ` was beyond the table and the last sample was used.
    pub clamped: bool,
}

/// Monotone samples `(y, x*)` of the inverse congestion polynomial.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowTable {
    y_max:  f64,
    dy:     f64,
    y:      Vec<f64>,
    x_star: Vec<f64>,
}

impl FlowTable {
    /// Solve the table for `y ∈ [0, y_max)` at step `dy`.
    pub fn solve(y_max: f64, dy: f64) -> NetworkResult<FlowTable> {
        if !(dy.is_finite() && dy > 0.0) {
            return Err(NetworkError::FlowTable(format!("dy must be positive, got {dy}")));
        }
        if !(y_max.is_finite() && y_max > dy) {
            return Err(NetworkError::FlowTable(format!(
                "y_max must exceed dy ({dy}), got {y_max}"
            )));
        }

        let samples = ((y_max / dy) - INDEX_SLACK).ceil() as usize;
        let mut y = Vec::with_capacity(samples);
        let mut x_star = Vec::with_capacity(samples);

        let mut lower = 0.0;
        for i in 0..samples {
            let target = i as f64 * dy;
            let x = solve_sample(target, lower, dy);
            y.push(target);
            x_star.push(x);
            lower = x;
        }

        Ok(FlowTable { y_max, dy, y, x_star })
    }

    /// Load a table from disk, or solve and save it if the file is missing,
    /// unreadable, or was built with different parameters.
    pub fn load_or_solve(path: &Path, y_max: f64, dy: f64) -> NetworkResult<FlowTable> {
        if path.exists() {
            match FlowTable::load(path) {
                Ok(table) if table.matches(y_max, dy) => {
                    log::info!(
                        "loaded counts-to-flow table from {} ({} samples)",
                        path.display(),
                        table.len()
                    );
                    return Ok(table);
                }
                Ok(_) => log::info!(
                    "cached table {} has different parameters; re-solving",
                    path.display()
                ),
                Err(e) => log::warn!("could not read cached table {}: {e}; re-solving", path.display()),
            }
        }

        let table = FlowTable::solve(y_max, dy)?;
        log::info!(
            "solved counts-to-flow table: {} samples, total estimation error {:.6}",
            table.len(),
            table.total_error()
        );
        table.save(path)?;
        Ok(table)
    }

    /// Write the table with bincode.
    pub fn save(&self, path: &Path) -> NetworkResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Read a table written by [`save`](Self::save) and check its shape.
    pub fn load(path: &Path) -> NetworkResult<FlowTable> {
        let reader = BufReader::new(File::open(path)?);
        let table: FlowTable = bincode::deserialize_from(reader)?;
        table.check_shape()?;
        Ok(table)
    }

    fn check_shape(&self) -> NetworkResult<()> {
        if self.y.is_empty() || self.y.len() != self.x_star.len() {
            return Err(NetworkError::FlowTable(format!(
                "malformed table: {} y samples, {} x* samples",
                self.y.len(),
                self.x_star.len()
            )));
        }
        if !(self.dy.is_finite() && self.dy > 0.0) {
            return Err(NetworkError::FlowTable(format!("malformed table: dy = {}", self.dy)));
        }
        Ok(())
    }

    fn matches(&self, y_max: f64, dy: f64) -> bool {
        (self.y_max - y_max).abs() < 1e-12 && (self.dy - dy).abs() < 1e-15
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Sample abscissae `y`.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Sample solutions `x*`.
    pub fn x_star(&self) -> &[f64] {
        &self.x_star
    }

    /// Σ |f(x*) − y| over all samples.  Sanity diagnostic only.
    pub fn total_error(&self) -> f64 {
        self.y
            .iter()
            .zip(&self.x_star)
            .map(|(&y, &x)| (congestion_polynomial(x) - y).abs())
            .sum()
    }

    /// Look up `x*(ŷ)` by truncating to the sample at or below `ŷ`.
    ///
    /// Negative or NaN `ŷ` maps to sample 0.  `ŷ` past the last sample is
    /// clamped to it and flagged; the caller decides how loudly to report it.
    pub fn lookup(&self, y_hat: f64) -> FlowLookup {
        let last = self.x_star.len() - 1;
        let raw = if y_hat.is_nan() || y_hat <= 0.0 {
            0.0
        } else {
            (y_hat / self.dy + INDEX_SLACK).floor()
        };

        if raw > last as f64 {
            FlowLookup { x_star: self.x_star[last], index: last, clamped: true }
        } else {
            let index = raw as usize;
            FlowLookup { x_star: self.x_star[index], index, clamped: false }
        }
    }
}

/// Largest sweep point strictly below the root of `f(x) = y`, refined until
/// the residual is under `dx`.  `lower` must satisfy `f(lower) ≤ y`.
fn solve_sample(y: f64, lower: f64, dx: f64) -> f64 {
    if congestion_polynomial(lower) >= y {
        return lower;
    }

    // Sweep: invariant f(lo) < y.
    let mut lo = lower;
    let mut hi = lower + dx;
    while congestion_polynomial(hi) < y {
        lo = hi;
        hi += dx;
    }

    // Narrow [lo, hi) keeping f(lo) < y ≤ f(hi).
    while y - congestion_polynomial(lo) >= dx {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if congestion_polynomial(mid) < y {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}
