//! The vehicle population of one regime.

use dprt_core::{EdgeId, Regime, Tick, VehicleId, VertexId};
use dprt_network::{NetworkError, NetworkState};

use crate::{EdgeKinematics, Vehicle, VehicleResult, VehicleStatus};

/// Result of a spawn request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Spawn {
    Spawned(VehicleId),
    /// Origin equals destination; there is no trip to make.
    SameVertex,
    /// No path under the current routing view.
    Unreachable,
}

/// Active and completed vehicles for one regime.
///
/// Ids are assigned sequentially from 0, one per trip with distinct
/// endpoints.  An unreachable trip uses up its id without making a vehicle,
/// so the same id names the same trip in both regimes.
#[derive(Debug)]
pub struct Fleet {
    regime:    Regime,
    active:    Vec<Vehicle>,
    completed: Vec<Vehicle>,
    next_id:   u64,
    spawned:   u64,
}

impl Fleet {
    pub fn new(regime: Regime) -> Self {
        Self { regime, active: Vec::new(), completed: Vec::new(), next_id: 0, spawned: 0 }
    }

    /// Create a vehicle from `origin` to `destination` on `network`'s current
    /// routing view, fixing its path and ETA now.
    ///
    /// # Errors
    ///
    /// Out-of-range vertices and a path that cannot be mapped back to edges
    /// (`NoSuchEdge`) are errors.  An unreachable destination is not.
    pub fn spawn(
        &mut self,
        origin:      VertexId,
        destination: VertexId,
        now:         Tick,
        network:     &mut NetworkState,
    ) -> VehicleResult<Spawn> {
        network.topology().check_vertex(origin)?;
        network.topology().check_vertex(destination)?;
        if origin == destination {
            return Ok(Spawn::SameVertex);
        }

        let path = match network.shortest_path(origin, destination) {
            Ok(path) => path,
            Err(NetworkError::Unreachable { from, to }) => {
                log::debug!("{}: no path {from} → {to} at {now}; skipping", self.regime);
                self.next_id += 1;
                return Ok(Spawn::Unreachable);
            }
            Err(e) => return Err(e.into()),
        };
        let eta = network.estimate_travel_time(origin, destination)?;

        let id = VehicleId(self.next_id);
        let vehicle = Vehicle::new(id, origin, destination, path, now, eta, network.topology())?;
        self.next_id += 1;
        self.spawned += 1;
        self.active.push(vehicle);
        Ok(Spawn::Spawned(id))
    }

    /// Advance every active vehicle one step.  Returns how many completed.
    pub fn advance_all<K: EdgeKinematics>(&mut self, network: &K, delta_t_secs: f64) -> usize {
        self.active
            .iter_mut()
            .map(|v| v.advance(network, delta_t_secs))
            .filter(|status| *status == VehicleStatus::Completed)
            .count()
    }

    /// Move completed vehicles from the active list to the completed list,
    /// keeping the relative order of both.  Returns how many moved.
    pub fn reap(&mut self) -> usize {
        let before = self.completed.len();
        let (done, still_active): (Vec<Vehicle>, Vec<Vehicle>) =
            std::mem::take(&mut self.active).into_iter().partition(Vehicle::is_completed);
        self.active = still_active;
        self.completed.extend(done);
        self.completed.len() - before
    }

    /// One edge per active vehicle, for `NetworkState::update_latency`.
    pub fn occupied_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.active.iter().filter_map(Vehicle::current_edge)
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn active(&self) -> &[Vehicle] {
        &self.active
    }

    pub fn completed(&self) -> &[Vehicle] {
        &self.completed
    }

    /// Take the completed list, leaving it empty.
    pub fn take_completed(&mut self) -> Vec<Vehicle> {
        std::mem::take(&mut self.completed)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Vehicles spawned so far.
    pub fn spawned_count(&self) -> u64 {
        self.spawned
    }

    pub fn is_drained(&self) -> bool {
        self.active.is_empty()
    }
}
