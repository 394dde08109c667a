//! Plain data row types written by output backends.

use dprt_core::{Regime, Tick};
use dprt_network::NetworkState;
use dprt_sim::StepStats;
use dprt_vehicle::Vehicle;

/// One completed trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow {
    pub regime:           Regime,
    pub vehicle_id:       u64,
    pub origin:           u32,
    pub destination:      u32,
    pub start_tick:       u64,
    pub finish_tick:      u64,
    pub travel_time_secs: f64,
    /// ETA from the routing view at creation.
    pub estimated_secs:   f64,
    /// `estimated − actual`; positive means the trip beat its ETA.
    pub error_secs:       f64,
    pub path_edges:       u32,
}

impl TripRow {
    pub fn from_vehicle(regime: Regime, vehicle: &Vehicle, delta_t_secs: f64) -> Self {
        let travel = vehicle.travel_secs(delta_t_secs);
        Self {
            regime,
            vehicle_id:       vehicle.id().0,
            origin:           vehicle.origin().0,
            destination:      vehicle.destination().0,
            start_tick:       vehicle.start().0,
            finish_tick:      vehicle.finish().0,
            travel_time_secs: travel,
            estimated_secs:   vehicle.estimated_secs(),
            error_secs:       vehicle.estimated_secs() - travel,
            path_edges:       vehicle.path().len() as u32,
        }
    }
}

/// One edge at one refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeUtilizationRow {
    pub tick:            u64,
    pub regime:          Regime,
    pub edge:            u32,
    /// True vehicle count.
    pub count:           u32,
    /// Count the routing view saw (noisy for the private regime).
    pub observed_count:  f64,
    /// Latency under the true count.
    pub latency:         f64,
    /// Latency vehicles were routed on.
    pub routing_latency: f64,
}

impl EdgeUtilizationRow {
    /// Rows for every edge of `network`'s current snapshot.
    pub fn snapshot(tick: Tick, network: &NetworkState) -> Vec<Self> {
        let counts = network.traffic_count();
        let observed = network.observed_count();
        let latency = network.latency();
        let routing = network.routing_latency();
        network
            .topology()
            .edges()
            .map(|e| {
                let i = e.index();
                Self {
                    tick:            tick.0,
                    regime:          network.regime(),
                    edge:            e.0,
                    count:           counts[i],
                    observed_count:  observed[i],
                    latency:         latency[i],
                    routing_latency: routing[i],
                }
            })
            .collect()
    }
}

/// Static per-edge listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCapacityRow {
    pub edge:           u32,
    pub tail:           u32,
    pub head:           u32,
    pub capacity:       f64,
    /// Count at which the edge leaves free flow under the active model.
    pub critical_count: f64,
    pub base_latency:   f64,
}

impl EdgeCapacityRow {
    pub fn listing(network: &NetworkState) -> Vec<Self> {
        let topo = network.topology();
        let model = network.model();
        topo.edges()
            .map(|e| Self {
                edge:           e.0,
                tail:           topo.edge_tail[e.index()].0,
                head:           topo.edge_head[e.index()].0,
                capacity:       topo.edge_capacity[e.index()],
                critical_count: model.critical_count(topo, e),
                base_latency:   topo.base_latency(e),
            })
            .collect()
    }
}

/// Counters for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub tick:              u64,
    pub phase:             &'static str,
    pub demand:            u64,
    pub exact_spawned:     u64,
    pub exact_completed:   u64,
    pub exact_active:      u64,
    pub private_spawned:   u64,
    pub private_completed: u64,
    pub private_active:    u64,
    /// Trips skipped as unreachable, both regimes.
    pub unreachable:       u64,
}

impl From<&StepStats> for StepSummaryRow {
    fn from(s: &StepStats) -> Self {
        Self {
            tick:              s.tick.0,
            phase:             s.phase.as_str(),
            demand:            s.demand,
            exact_spawned:     s.exact.spawned,
            exact_completed:   s.exact.completed,
            exact_active:      s.exact.active,
            private_spawned:   s.private.spawned,
            private_completed: s.private.completed,
            private_active:    s.private.active,
            unreachable:       s.exact.unreachable + s.private.unreachable,
        }
    }
}
