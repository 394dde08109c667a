//! Edge latency as a function of edge counts.
//!
//! Every model starts from the free-flow time `base = length / speed` and
//! returns exactly `base` when the count is zero:
//!
//! | Model      | Latency                                                    |
//! |------------|------------------------------------------------------------|
//! | `Quartic`  | `base · (1 + 0.15 · (count / capacity)^4)`                  |
//! | `Table`    | `base · (1 + 0.15 · x*(ŷ)^4)`, `ŷ = count / (capacity·base)` |
//! | `Overflow` | `base` if `count ≤ capacity`, else `base + α·(count − capacity)^4` |
//!
//! All three are non-decreasing in `count`.

use std::sync::Arc;

use dprt_core::{EdgeId, LatencyModelKind};

use crate::flow_table::FLOW_COEFFICIENT;
use crate::{FlowTable, NetworkError, NetworkResult, Topology};

/// Latencies for every edge plus the edges whose table lookup was clamped.
#[derive(Clone, Debug, Default)]
pub struct LatencyEval {
    pub latency:       Vec<f64>,
    pub clamped_edges: Vec<EdgeId>,
}

/// Congestion formula, selected by configuration.
///
/// The `Table` variant holds the counts-to-flow table it was built with;
/// the table is immutable and shared between regimes.
#[derive(Clone, Debug)]
pub enum LatencyModel {
    Quartic,
    Table(Arc<FlowTable>),
    Overflow { alpha: f64 },
}

impl LatencyModel {
    /// Build from a config kind.  `Table` requires `table`.
    pub fn from_kind(kind: LatencyModelKind, table: Option<Arc<FlowTable>>) -> NetworkResult<Self> {
        match kind {
            LatencyModelKind::Quartic => Ok(LatencyModel::Quartic),
            LatencyModelKind::Overflow { alpha } => Ok(LatencyModel::Overflow { alpha }),
            LatencyModelKind::Table => table.map(LatencyModel::Table).ok_or_else(|| {
                NetworkError::Model("table latency model requires a counts-to-flow table".into())
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LatencyModel::Quartic       => "quartic",
            LatencyModel::Table(_)      => "table",
            LatencyModel::Overflow { .. } => "overflow",
        }
    }

    /// Latency of `edge` carrying `count` vehicles, and whether a table
    /// lookup had to be clamped.
    pub fn edge_latency(&self, topology: &Topology, edge: EdgeId, count: f64) -> (f64, bool) {
        let base = topology.base_latency(edge);
        if count <= 0.0 {
            return (base, false);
        }
        let capacity = topology.edge_capacity[edge.index()];

        match self {
            LatencyModel::Quartic => {
                let ratio = count / capacity;
                (base * (1.0 + FLOW_COEFFICIENT * ratio.powi(4)), false)
            }
            LatencyModel::Table(table) => {
                let y_hat = count / (capacity * base);
                let hit = table.lookup(y_hat);
                (base * (1.0 + FLOW_COEFFICIENT * hit.x_star.powi(4)), hit.clamped)
            }
            LatencyModel::Overflow { alpha } => {
                if count <= capacity || *alpha == 0.0 {
                    (base, false)
                } else {
                    (base + alpha * (count - capacity).powi(4), false)
                }
            }
        }
    }

    /// Evaluate every edge.  `counts` is indexed by `EdgeId`.
    pub fn evaluate(&self, topology: &Topology, counts: &[f64]) -> LatencyEval {
        debug_assert_eq!(counts.len(), topology.edge_count());
        let mut eval = LatencyEval {
            latency:       Vec::with_capacity(counts.len()),
            clamped_edges: Vec::new(),
        };
        for (edge, &count) in topology.edges().zip(counts) {
            let (latency, clamped) = self.edge_latency(topology, edge, count);
            eval.latency.push(latency);
            if clamped {
                eval.clamped_edges.push(edge);
            }
        }
        eval
    }

    /// Count at which `edge` leaves the free-flow regime.
    ///
    /// For the quartic and overflow models this is the capacity; for the
    /// table model it is the count giving `ŷ = 1`.
    pub fn critical_count(&self, topology: &Topology, edge: EdgeId) -> f64 {
        let capacity = topology.edge_capacity[edge.index()];
        match self {
            LatencyModel::Table(_) => capacity * topology.base_latency(edge),
            LatencyModel::Quartic | LatencyModel::Overflow { .. } => capacity,
        }
    }
}
