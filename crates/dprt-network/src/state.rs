//! Per-regime mutable network state.
//!
//! # Two views
//!
//! A `NetworkState` keeps a **true view** built from the exact edge counts
//! and, when its [`CountObservation`] is noisy, a separate **routing view**
//! built from the observed counts:
//!
//! | Consumer                       | View            |
//! |--------------------------------|-----------------|
//! | vehicle speed (`edge_speed`)   | true            |
//! | `shortest_path`, ETA           | routing         |
//! | `true_travel_time`             | true            |
//!
//! For the exact regime the routing view *is* the true view.  Each view owns
//! its latency vector and path table; two states never share either.
//!
//! # Lifecycle
//!
//! Counts, latencies, and path tables are replaced wholesale by
//! [`NetworkState::update_latency`].  Path tables are computed eagerly there
//! and lazily on the first query if a state has never been refreshed.

use std::sync::Arc;

use dprt_core::{EdgeId, Regime, VertexId};

use crate::{CountObservation, LatencyModel, NetworkError, NetworkResult, PathTable, Topology};

// ── LatencyView ───────────────────────────────────────────────────────────────

/// Counts → latency → path table, for one source of counts.
#[derive(Clone, Debug)]
pub struct LatencyView {
    counts:  Vec<f64>,
    latency: Vec<f64>,
    paths:   Option<PathTable>,
}

impl LatencyView {
    fn new(counts: Vec<f64>, latency: Vec<f64>) -> Self {
        Self { counts, latency, paths: None }
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn latency(&self) -> &[f64] {
        &self.latency
    }

    pub fn paths(&self) -> Option<&PathTable> {
        self.paths.as_ref()
    }

    fn ensure_paths(&mut self, topology: &Topology) -> NetworkResult<&PathTable> {
        let paths = match self.paths.take() {
            Some(p) => p,
            None => PathTable::compute(topology, &self.latency)?,
        };
        Ok(self.paths.insert(paths))
    }
}

// ── RefreshReport ─────────────────────────────────────────────────────────────

/// What one `update_latency` call did, for logging and observers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RefreshReport {
    pub regime:        Regime,
    /// 1-based refresh counter.
    pub refresh:       u64,
    /// Vehicles counted onto edges.
    pub vehicles:      usize,
    pub max_count:     u32,
    pub clamped_edges: usize,
    pub noisy:         bool,
}

// ── NetworkState ──────────────────────────────────────────────────────────────

/// Edge counts, latencies, and shortest-path tables for one regime.
pub struct NetworkState {
    regime:        Regime,
    topology:      Arc<Topology>,
    model:         LatencyModel,
    observation:   CountObservation,
    traffic_count: Vec<u32>,
    truth:         LatencyView,
    /// Present only for noisy observation, after the first refresh.
    observed:      Option<LatencyView>,
    refreshes:     u64,
}

impl NetworkState {
    /// Empty network: zero counts, free-flow latencies, no path tables yet.
    pub fn new(
        regime:      Regime,
        topology:    Arc<Topology>,
        model:       LatencyModel,
        observation: CountObservation,
    ) -> Self {
        let edge_count = topology.edge_count();
        let base: Vec<f64> = topology.edges().map(|e| topology.base_latency(e)).collect();
        Self {
            regime,
            model,
            observation,
            traffic_count: vec![0; edge_count],
            truth: LatencyView::new(vec![0.0; edge_count], base),
            observed: None,
            refreshes: 0,
            topology,
        }
    }

    // ── Refresh ───────────────────────────────────────────────────────────

    /// Rebuild counts from the edges currently occupied, then recompute
    /// latencies and path tables for every view.
    ///
    /// `occupied` yields one edge per vehicle.  Any cached path queries are
    /// invalidated.
    pub fn update_latency<I>(&mut self, occupied: I) -> NetworkResult<RefreshReport>
    where
        I: IntoIterator<Item = EdgeId>,
    {
        let mut counts = vec![0u32; self.topology.edge_count()];
        let mut vehicles = 0usize;
        for edge in occupied {
            self.topology.check_edge(edge)?;
            counts[edge.index()] += 1;
            vehicles += 1;
        }
        let counts_f: Vec<f64> = counts.iter().map(|&c| c as f64).collect();

        // True view.
        let truth_eval = self.model.evaluate(&self.topology, &counts_f);
        let mut clamped = truth_eval.clamped_edges.len();
        let mut truth = LatencyView::new(counts_f, truth_eval.latency);
        truth.ensure_paths(&self.topology)?;

        // Routing view, if observation differs from the truth.
        let observed = match self.observation.observe(truth.counts()) {
            None => None,
            Some(noisy_counts) => {
                let eval = self.model.evaluate(&self.topology, &noisy_counts);
                clamped += eval.clamped_edges.len();
                let mut view = LatencyView::new(noisy_counts, eval.latency);
                view.ensure_paths(&self.topology)?;
                Some(view)
            }
        };

        if clamped > 0 {
            log::warn!(
                "{}: {clamped} edge lookup(s) exceeded the counts-to-flow table (y_max too small); clamped",
                self.regime
            );
        }

        self.refreshes += 1;
        let report = RefreshReport {
            regime:        self.regime,
            refresh:       self.refreshes,
            vehicles,
            max_count:     counts.iter().copied().max().unwrap_or(0),
            clamped_edges: clamped,
            noisy:         observed.is_some(),
        };
        log::debug!(
            "{} refresh #{}: {} vehicles, max edge count {}",
            self.regime, report.refresh, report.vehicles, report.max_count
        );

        self.traffic_count = counts;
        self.truth = truth;
        self.observed = observed;
        Ok(report)
    }

    // ── Routing queries ───────────────────────────────────────────────────

    /// Edge path from `origin` to `destination` on the routing view.
    ///
    /// Deterministic between refreshes.  Empty when `origin == destination`.
    pub fn shortest_path(&mut self, origin: VertexId, destination: VertexId) -> NetworkResult<Vec<EdgeId>> {
        let topology = &self.topology;
        let view = match self.observed.as_mut() {
            Some(v) => v,
            None => &mut self.truth,
        };
        view.ensure_paths(topology)?.edge_path(topology, origin, destination)
    }

    /// Estimated trip time on the routing view: the total latency of the
    /// path `shortest_path` returns for the same pair.
    pub fn estimate_travel_time(&mut self, origin: VertexId, destination: VertexId) -> NetworkResult<f64> {
        let topology = &self.topology;
        let view = match self.observed.as_mut() {
            Some(v) => v,
            None => &mut self.truth,
        };
        distance_or_unreachable(view.ensure_paths(topology)?, topology, origin, destination)
    }

    /// Trip time on the true view (what an oracle with exact counts would
    /// predict).  Equal to `estimate_travel_time` for the exact regime.
    pub fn true_travel_time(&mut self, origin: VertexId, destination: VertexId) -> NetworkResult<f64> {
        let topology = &self.topology;
        distance_or_unreachable(self.truth.ensure_paths(topology)?, topology, origin, destination)
    }

    /// Sum of routing-view latencies along `path`.
    pub fn path_latency(&self, path: &[EdgeId]) -> f64 {
        let latency = self.routing_latency();
        path.iter().map(|e| latency[e.index()]).sum()
    }

    // ── Kinematics accessors ──────────────────────────────────────────────

    /// Current speed on `edge`: `length / latency` under true congestion.
    /// Equals the free-flow speed on an empty edge.
    #[inline]
    pub fn edge_speed(&self, edge: EdgeId) -> f64 {
        self.topology.edge_length[edge.index()] / self.truth.latency[edge.index()]
    }

    #[inline]
    pub fn edge_length(&self, edge: EdgeId) -> f64 {
        self.topology.edge_length[edge.index()]
    }

    // ── Read-only state ───────────────────────────────────────────────────

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn model(&self) -> &LatencyModel {
        &self.model
    }

    pub fn is_noisy(&self) -> bool {
        self.observation.is_noisy()
    }

    /// True vehicle counts from the last refresh.
    pub fn traffic_count(&self) -> &[u32] {
        &self.traffic_count
    }

    /// Latency under true counts.
    pub fn latency(&self) -> &[f64] {
        self.truth.latency()
    }

    /// Counts the routing view was built from (noisy for the private regime).
    pub fn observed_count(&self) -> &[f64] {
        self.routing_view().counts()
    }

    /// Latency vehicles are routed on.
    pub fn routing_latency(&self) -> &[f64] {
        self.routing_view().latency()
    }

    pub fn routing_view(&self) -> &LatencyView {
        self.observed.as_ref().unwrap_or(&self.truth)
    }

    pub fn true_view(&self) -> &LatencyView {
        &self.truth
    }

    /// Number of completed `update_latency` calls.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

fn distance_or_unreachable(
    paths:       &PathTable,
    topology:    &Topology,
    origin:      VertexId,
    destination: VertexId,
) -> NetworkResult<f64> {
    topology.check_vertex(origin)?;
    topology.check_vertex(destination)?;
    paths
        .distance(origin, destination)
        .ok_or(NetworkError::Unreachable { from: origin, to: destination })
}
