//! All-pairs shortest paths over latency-weighted edges.
//!
//! # Algorithm
//!
//! One Dijkstra per source vertex over the CSR adjacency, O(V · E · log V),
//! which is never worse than Floyd–Warshall's O(V³) on road graphs.  With the
//! `parallel` feature the sources run on Rayon's thread pool; the result is
//! identical either way.
//!
//! Weights are latencies and must be strictly positive; `+∞` marks an edge no
//! route may use.
//!
//! # Storage
//!
//! Row-major `V × V` matrices:
//!
//! - `dist[o·V + d]` — shortest latency from `o` to `d` (`+∞` if unreachable)
//! - `pred[o·V + d]` — vertex before `d` on that path (`VertexId::INVALID`
//!   for `d == o` and for unreachable `d`)

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use dprt_core::{EdgeId, VertexId};

use crate::{NetworkError, NetworkResult, Topology};

// ── Heap entry ────────────────────────────────────────────────────────────────

/// Min-heap entry ordered by cost, then vertex id for deterministic ties.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost:   f64,
    vertex: VertexId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── PathTable ─────────────────────────────────────────────────────────────────

/// Shortest distances and predecessors for every ordered vertex pair.
///
/// Valid for the latency vector it was computed from only.
#[derive(Clone, Debug)]
pub struct PathTable {
    n:    usize,
    dist: Vec<f64>,
    pred: Vec<VertexId>,
}

impl PathTable {
    /// Compute the table for `weights` (indexed by `EdgeId`).
    pub fn compute(topology: &Topology, weights: &[f64]) -> NetworkResult<PathTable> {
        if weights.len() != topology.edge_count() {
            return Err(NetworkError::Parse(format!(
                "{} weights for {} edges",
                weights.len(),
                topology.edge_count()
            )));
        }
        // `+∞` is allowed: an overflowed latency just makes the edge unusable.
        for (edge, &w) in topology.edges().zip(weights) {
            if w.is_nan() || w <= 0.0 {
                return Err(NetworkError::InvalidWeight { edge, weight: w });
            }
        }

        let n = topology.vertex_count();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<(Vec<f64>, Vec<VertexId>)> = (0..n)
            .map(|s| single_source(topology, weights, VertexId(s as u32)))
            .collect();

        #[cfg(feature = "parallel")]
        let rows: Vec<(Vec<f64>, Vec<VertexId>)> = {
            use rayon::prelude::*;
            (0..n)
                .into_par_iter()
                .map(|s| single_source(topology, weights, VertexId(s as u32)))
                .collect()
        };

        let mut dist = Vec::with_capacity(n * n);
        let mut pred = Vec::with_capacity(n * n);
        for (d_row, p_row) in rows {
            dist.extend(d_row);
            pred.extend(p_row);
        }

        Ok(PathTable { n, dist, pred })
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Shortest latency from `origin` to `destination`, `None` if unreachable
    /// or either vertex is out of range.
    pub fn distance(&self, origin: VertexId, destination: VertexId) -> Option<f64> {
        let i = self.slot(origin, destination)?;
        let d = self.dist[i];
        d.is_finite().then_some(d)
    }

    /// Vertex preceding `destination` on the shortest path from `origin`.
    pub fn predecessor(&self, origin: VertexId, destination: VertexId) -> Option<VertexId> {
        let i = self.slot(origin, destination)?;
        let p = self.pred[i];
        p.is_valid().then_some(p)
    }

    /// Vertex sequence from `origin` to `destination`, inclusive.
    pub fn vertex_path(&self, origin: VertexId, destination: VertexId) -> NetworkResult<Vec<VertexId>> {
        for v in [origin, destination] {
            if v.index() >= self.n {
                return Err(NetworkError::VertexOutOfRange { vertex: v, count: self.n });
            }
        }
        if origin == destination {
            return Ok(vec![origin]);
        }
        if self.distance(origin, destination).is_none() {
            return Err(NetworkError::Unreachable { from: origin, to: destination });
        }

        let mut path = vec![destination];
        let mut current = destination;
        while current != origin {
            // A path never revisits a vertex, so n hops is a hard ceiling.
            if path.len() > self.n {
                return Err(NetworkError::Unreachable { from: origin, to: destination });
            }
            current = self
                .predecessor(origin, current)
                .ok_or(NetworkError::Unreachable { from: origin, to: destination })?;
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }

    /// Edge sequence from `origin` to `destination`.  Empty if they coincide.
    pub fn edge_path(
        &self,
        topology:    &Topology,
        origin:      VertexId,
        destination: VertexId,
    ) -> NetworkResult<Vec<EdgeId>> {
        let vertices = self.vertex_path(origin, destination)?;
        vertices
            .windows(2)
            .map(|pair| {
                topology
                    .edge_between(pair[0], pair[1])
                    .ok_or(NetworkError::NoSuchEdge { tail: pair[0], head: pair[1] })
            })
            .collect()
    }

    #[inline]
    fn slot(&self, origin: VertexId, destination: VertexId) -> Option<usize> {
        (origin.index() < self.n && destination.index() < self.n)
            .then(|| origin.index() * self.n + destination.index())
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn single_source(topology: &Topology, weights: &[f64], source: VertexId) -> (Vec<f64>, Vec<VertexId>) {
    let n = topology.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred = vec![VertexId::INVALID; n];

    dist[source.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { cost: 0.0, vertex: source });

    while let Some(Frontier { cost, vertex }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[vertex.index()] {
            continue;
        }

        for edge in topology.out_edges(vertex) {
            let next = topology.edge_head[edge.index()];
            let new_cost = cost + weights[edge.index()];

            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                pred[next.index()] = vertex;
                heap.push(Frontier { cost: new_cost, vertex: next });
            }
        }
    }

    (dist, pred)
}
