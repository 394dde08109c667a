//! Per-vehicle travel state.

use dprt_core::{EdgeId, Tick, VehicleId, VertexId};
use dprt_network::{NetworkState, Topology};

use crate::{VehicleError, VehicleResult};

/// Progress within this distance of 1.0 counts as reaching the edge end.
pub const PROGRESS_EPS: f64 = 1e-9;

/// Per-edge speed and length, as seen by a moving vehicle.
///
/// Implemented by [`NetworkState`]; tests can supply fixed values.
pub trait EdgeKinematics {
    /// Current speed on `edge` (length units per second).
    fn edge_speed(&self, edge: EdgeId) -> f64;

    fn edge_length(&self, edge: EdgeId) -> f64;
}

impl EdgeKinematics for NetworkState {
    #[inline]
    fn edge_speed(&self, edge: EdgeId) -> f64 {
        NetworkState::edge_speed(self, edge)
    }

    #[inline]
    fn edge_length(&self, edge: EdgeId) -> f64 {
        NetworkState::edge_length(self, edge)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VehicleStatus {
    Traveling,
    /// Terminal.
    Completed,
}

/// A single trip.
///
/// `finish` starts equal to `start` and moves forward one tick for every
/// step the vehicle is advanced, so `finish − start` is its travel time in
/// steps once it completes.
#[derive(Clone, Debug)]
pub struct Vehicle {
    id:            VehicleId,
    origin:        VertexId,
    destination:   VertexId,
    path:          Box<[EdgeId]>,
    /// Index into `path` of the edge currently occupied.
    position:      usize,
    /// Fraction of the current edge covered, in `[0, 1)`.
    progress:      f64,
    start:         Tick,
    finish:        Tick,
    estimated_secs: f64,
    status:        VehicleStatus,
}

impl Vehicle {
    /// New vehicle at the start of `path`.
    ///
    /// `path` must be non-empty and connected (`head(e[i]) == tail(e[i+1])`).
    pub fn new(
        id:             VehicleId,
        origin:         VertexId,
        destination:    VertexId,
        path:           Vec<EdgeId>,
        start:          Tick,
        estimated_secs: f64,
        topology:       &Topology,
    ) -> VehicleResult<Vehicle> {
        if path.is_empty() {
            return Err(VehicleError::EmptyPath(id));
        }
        for edge in &path {
            topology.check_edge(*edge)?;
        }
        for (position, pair) in path.windows(2).enumerate() {
            if topology.edge_head[pair[0].index()] != topology.edge_tail[pair[1].index()] {
                return Err(VehicleError::DisconnectedPath { vehicle: id, position });
            }
        }

        Ok(Vehicle {
            id,
            origin,
            destination,
            path: path.into_boxed_slice(),
            position: 0,
            progress: 0.0,
            start,
            finish: start,
            estimated_secs,
            status: VehicleStatus::Traveling,
        })
    }

    /// Advance one step of `delta_t_secs` and return the new status.
    ///
    /// Completed vehicles are left untouched.
    pub fn advance<K: EdgeKinematics>(&mut self, network: &K, delta_t_secs: f64) -> VehicleStatus {
        if self.status == VehicleStatus::Completed {
            return self.status;
        }
        self.finish = self.finish + 1;

        let edge = self.path[self.position];
        self.progress += delta_t_secs * network.edge_speed(edge) / network.edge_length(edge);

        if self.progress >= 1.0 - PROGRESS_EPS {
            self.progress = 0.0;
            self.position += 1;
            if self.position == self.path.len() {
                self.status = VehicleStatus::Completed;
            }
        }
        self.status
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn origin(&self) -> VertexId {
        self.origin
    }

    pub fn destination(&self) -> VertexId {
        self.destination
    }

    pub fn path(&self) -> &[EdgeId] {
        &self.path
    }

    /// Edge currently occupied; `None` once completed.
    #[inline]
    pub fn current_edge(&self) -> Option<EdgeId> {
        self.path.get(self.position).copied()
    }

    /// Index of the current edge within the path.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn start(&self) -> Tick {
        self.start
    }

    pub fn finish(&self) -> Tick {
        self.finish
    }

    /// Steps spent on the network so far.
    pub fn travel_steps(&self) -> u64 {
        self.finish.since(self.start)
    }

    pub fn travel_secs(&self, delta_t_secs: f64) -> f64 {
        self.travel_steps() as f64 * delta_t_secs
    }

    /// ETA from the routing view at creation.
    pub fn estimated_secs(&self) -> f64 {
        self.estimated_secs
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == VehicleStatus::Completed
    }
}
