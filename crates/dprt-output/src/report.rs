//! Exact-vs-private trip comparison and run-level summary.
//!
//! Both regimes spawn the same trips in the same order, so a vehicle id
//! names the same trip in each.  Trips completed in only one regime (the
//! other vehicle was still active when the run ended) are left out.

use rustc_hash::FxHashMap;

use dprt_core::EdgeId;
use dprt_vehicle::Vehicle;

/// One trip as driven in both regimes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripComparison {
    pub vehicle_id:                    u64,
    pub origin:                        u32,
    pub destination:                   u32,
    pub travel_time_secs:              f64,
    pub private_travel_time_secs:      f64,
    pub estimated_secs:                f64,
    pub private_estimated_secs:        f64,
    /// `estimated − actual` in the exact regime.
    pub estimation_error_secs:         f64,
    /// `estimated − actual` in the private regime.
    pub private_estimation_error_secs: f64,
    /// Shared edges over the longer path's edge count.
    pub path_similarity:               f64,
}

impl TripComparison {
    pub fn identical_path(&self) -> bool {
        self.path_similarity >= 1.0
    }
}

/// Fraction of edges the two paths share: `|a ∩ b| / max(|a|, |b|)`.
///
/// 1.0 for identical paths, 0.0 for disjoint ones.  Two empty paths are
/// identical.
pub fn path_similarity(a: &[EdgeId], b: &[EdgeId]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let shared = a.iter().filter(|e| b.contains(e)).count();
    shared as f64 / longest as f64
}

/// Pair completed trips by vehicle id.  Output is in ascending id order.
pub fn compare_trips(exact: &[Vehicle], private: &[Vehicle], delta_t_secs: f64) -> Vec<TripComparison> {
    let by_id: FxHashMap<u64, &Vehicle> = private.iter().map(|v| (v.id().0, v)).collect();

    let mut pairs: Vec<TripComparison> = exact
        .iter()
        .filter_map(|e| by_id.get(&e.id().0).map(|p| (e, *p)))
        .map(|(e, p)| {
            let travel = e.travel_secs(delta_t_secs);
            let private_travel = p.travel_secs(delta_t_secs);
            TripComparison {
                vehicle_id:                    e.id().0,
                origin:                        e.origin().0,
                destination:                   e.destination().0,
                travel_time_secs:              travel,
                private_travel_time_secs:      private_travel,
                estimated_secs:                e.estimated_secs(),
                private_estimated_secs:        p.estimated_secs(),
                estimation_error_secs:         e.estimated_secs() - travel,
                private_estimation_error_secs: p.estimated_secs() - private_travel,
                path_similarity:               path_similarity(e.path(), p.path()),
            }
        })
        .collect();

    pairs.sort_by_key(|c| c.vehicle_id);
    pairs
}

/// Aggregate of a run's trip comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub trips:                                  usize,
    pub total_travel_time_secs:                 f64,
    pub total_private_travel_time_secs:         f64,
    pub mean_travel_time_secs:                  f64,
    pub mean_private_travel_time_secs:          f64,
    /// `private_total / exact_total − 1`: the cost of routing on noisy counts.
    pub travel_time_increase:                   f64,
    pub mean_abs_estimation_error_secs:         f64,
    pub mean_abs_private_estimation_error_secs: f64,
    pub mean_path_similarity:                   f64,
    pub identical_path_fraction:                f64,
}

impl RunSummary {
    /// Summarise `comparisons`.  All fields are zero when there are none.
    pub fn from_comparisons(comparisons: &[TripComparison]) -> Self {
        if comparisons.is_empty() {
            return Self::default();
        }
        let n = comparisons.len() as f64;
        let sum = |f: fn(&TripComparison) -> f64| comparisons.iter().map(f).sum::<f64>();

        let total = sum(|c| c.travel_time_secs);
        let total_private = sum(|c| c.private_travel_time_secs);
        let identical = comparisons.iter().filter(|c| c.identical_path()).count();

        Self {
            trips: comparisons.len(),
            total_travel_time_secs: total,
            total_private_travel_time_secs: total_private,
            mean_travel_time_secs: total / n,
            mean_private_travel_time_secs: total_private / n,
            travel_time_increase: if total > 0.0 { total_private / total - 1.0 } else { 0.0 },
            mean_abs_estimation_error_secs: sum(|c| c.estimation_error_secs.abs()) / n,
            mean_abs_private_estimation_error_secs: sum(|c| c.private_estimation_error_secs.abs()) / n,
            mean_path_similarity: sum(|c| c.path_similarity) / n,
            identical_path_fraction: identical as f64 / n,
        }
    }
}
