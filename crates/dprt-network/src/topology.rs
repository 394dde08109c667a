//! Static road topology and builder.
//!
//! # Data layout
//!
//! Edge attributes are parallel arrays indexed by `EdgeId`, in the order the
//! edges were added (edge-table row order).  Outgoing adjacency is kept in
//! **Compressed Sparse Row (CSR)** form over a separate index array:
//!
//! ```text
//! out_edges[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! so Dijkstra's inner loop is a contiguous scan while edge ids stay equal
//! to their table row.  A `(tail, head) → EdgeId` map backs path
//! reconstruction.

use rustc_hash::FxHashMap;

use dprt_core::{EdgeId, VertexId};

use crate::{NetworkError, NetworkResult};

// ── Topology ──────────────────────────────────────────────────────────────────

/// Directed road graph with per-edge length, free-flow speed, and capacity.
///
/// Immutable once built; both regimes share one instance behind an `Arc`.
/// Construct with [`TopologyBuilder`].
#[derive(Clone, Debug)]
pub struct Topology {
    vertex_count: usize,

    /// CSR row pointer into `out_edges`.  Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    /// Edge ids grouped by tail vertex (stable within a vertex).
    pub out_edges: Vec<EdgeId>,

    pub edge_tail: Vec<VertexId>,
    pub edge_head: Vec<VertexId>,

    /// Edge length (same distance unit as speed × seconds).
    pub edge_length: Vec<f64>,

    /// Free-flow speed (distance unit per second).
    pub edge_free_flow_speed: Vec<f64>,

    /// Flow capacity, always > 0.
    pub edge_capacity: Vec<f64>,

    edge_lookup: FxHashMap<(VertexId, VertexId), EdgeId>,
}

impl Topology {
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Iterator over all edge ids in table order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(|i| EdgeId(i as u32))
    }

    /// Outgoing edges of `vertex` (contiguous slice scan, no allocation).
    #[inline]
    pub fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.vertex_out_start[vertex.index()] as usize;
        let end   = self.vertex_out_start[vertex.index() + 1] as usize;
        self.out_edges[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, vertex: VertexId) -> usize {
        let start = self.vertex_out_start[vertex.index()] as usize;
        let end   = self.vertex_out_start[vertex.index() + 1] as usize;
        end - start
    }

    /// The unique edge from `tail` to `head`, if any.
    #[inline]
    pub fn edge_between(&self, tail: VertexId, head: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&(tail, head)).copied()
    }

    /// Free-flow travel time `length / free_flow_speed`.
    #[inline]
    pub fn base_latency(&self, edge: EdgeId) -> f64 {
        self.edge_length[edge.index()] / self.edge_free_flow_speed[edge.index()]
    }

    pub fn check_vertex(&self, vertex: VertexId) -> NetworkResult<()> {
        if vertex.index() < self.vertex_count {
            Ok(())
        } else {
            Err(NetworkError::VertexOutOfRange { vertex, count: self.vertex_count })
        }
    }

    pub fn check_edge(&self, edge: EdgeId) -> NetworkResult<()> {
        if edge.index() < self.edge_count() {
            Ok(())
        } else {
            Err(NetworkError::EdgeOutOfRange { edge, count: self.edge_count() })
        }
    }

    /// Copy of this topology with every capacity multiplied by `factor`.
    ///
    /// Applied once per run for the capacity scenario; capacities are never
    /// recomputed from latency afterwards.
    pub fn with_capacity_scale(&self, factor: f64) -> NetworkResult<Topology> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(NetworkError::Parse(format!(
                "capacity scale must be positive, got {factor}"
            )));
        }
        let mut scaled = self.clone();
        for c in &mut scaled.edge_capacity {
            *c *= factor;
        }
        Ok(scaled)
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Construct a [`Topology`] incrementally, then call [`build`](Self::build).
///
/// Edge ids are assigned in insertion order.  `build()` validates every edge
/// and constructs the CSR adjacency.
///
/// # Example
///
/// ```
/// use dprt_network::TopologyBuilder;
///
/// let mut b = TopologyBuilder::new();
/// let a = b.add_vertex();
/// let c = b.add_vertex();
/// b.add_road(a, c, 1_000.0, 12.5, 40.0);
/// let topo = b.build().unwrap();
/// assert_eq!(topo.vertex_count(), 2);
/// assert_eq!(topo.edge_count(), 2); // both directions
/// ```
pub struct TopologyBuilder {
    vertex_count: usize,
    raw_edges:    Vec<RawEdge>,
}

struct RawEdge {
    tail:     VertexId,
    head:     VertexId,
    length:   f64,
    speed:    f64,
    capacity: f64,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self { vertex_count: 0, raw_edges: Vec::new() }
    }

    /// Start with `vertex_count` vertices already present (ids `0..n`).
    pub fn with_vertices(vertex_count: usize) -> Self {
        Self { vertex_count, raw_edges: Vec::new() }
    }

    /// Add a vertex and return its id (sequential from 0).
    pub fn add_vertex(&mut self) -> VertexId {
        let id = VertexId(self.vertex_count as u32);
        self.vertex_count += 1;
        id
    }

    /// Add a **directed** edge and return its id.
    pub fn add_edge(
        &mut self,
        tail:     VertexId,
        head:     VertexId,
        length:   f64,
        speed:    f64,
        capacity: f64,
    ) -> EdgeId {
        let id = EdgeId(self.raw_edges.len() as u32);
        self.raw_edges.push(RawEdge { tail, head, length, speed, capacity });
        id
    }

    /// Convenience: add the same road in both directions.
    pub fn add_road(&mut self, a: VertexId, b: VertexId, length: f64, speed: f64, capacity: f64) {
        self.add_edge(a, b, length, speed, capacity);
        self.add_edge(b, a, length, speed, capacity);
    }

    pub fn vertex_count(&self) -> usize { self.vertex_count }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and produce a [`Topology`].
    ///
    /// Fails on out-of-range vertices, self-loops, non-positive length or
    /// speed, zero (or negative) capacity, and duplicate `(tail, head)` pairs.
    pub fn build(self) -> NetworkResult<Topology> {
        let vertex_count = self.vertex_count;
        let edge_count = self.raw_edges.len();

        let mut edge_lookup: FxHashMap<(VertexId, VertexId), EdgeId> = FxHashMap::default();
        edge_lookup.reserve(edge_count);

        for (i, e) in self.raw_edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            for v in [e.tail, e.head] {
                if v.index() >= vertex_count {
                    return Err(NetworkError::VertexOutOfRange { vertex: v, count: vertex_count });
                }
            }
            if e.tail == e.head {
                return Err(NetworkError::InvalidEdge { edge: id, reason: "self-loop".into() });
            }
            if !(e.length.is_finite() && e.length > 0.0) {
                return Err(NetworkError::InvalidEdge {
                    edge: id,
                    reason: format!("length must be positive, got {}", e.length),
                });
            }
            if !(e.speed.is_finite() && e.speed > 0.0) {
                return Err(NetworkError::InvalidEdge {
                    edge: id,
                    reason: format!("free-flow speed must be positive, got {}", e.speed),
                });
            }
            if !(e.capacity.is_finite() && e.capacity > 0.0) {
                return Err(NetworkError::ZeroCapacity(id));
            }
            if edge_lookup.insert((e.tail, e.head), id).is_some() {
                return Err(NetworkError::DuplicateEdge { tail: e.tail, head: e.head });
            }
        }

        // CSR row pointer over tail vertices.
        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for e in &self.raw_edges {
            vertex_out_start[e.tail.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, edge_count);

        let mut out_edges: Vec<EdgeId> = (0..edge_count).map(|i| EdgeId(i as u32)).collect();
        out_edges.sort_by_key(|e| self.raw_edges[e.index()].tail.0);

        let raw = self.raw_edges;
        Ok(Topology {
            vertex_count,
            vertex_out_start,
            out_edges,
            edge_tail:            raw.iter().map(|e| e.tail).collect(),
            edge_head:            raw.iter().map(|e| e.head).collect(),
            edge_length:          raw.iter().map(|e| e.length).collect(),
            edge_free_flow_speed: raw.iter().map(|e| e.speed).collect(),
            edge_capacity:        raw.iter().map(|e| e.capacity).collect(),
            edge_lookup,
        })
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
