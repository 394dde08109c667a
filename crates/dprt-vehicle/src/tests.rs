//! Unit tests for dprt-vehicle.

use std::sync::Arc;

use dprt_core::{EdgeId, Regime, Tick, VehicleId, VertexId};
use dprt_network::{CountObservation, LatencyModel, NetworkState, Topology, TopologyBuilder};

use crate::{EdgeKinematics, Fleet, Spawn, Vehicle, VehicleError, VehicleStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Same speed and length on every edge.
struct Uniform {
    speed:  f64,
    length: f64,
}

impl EdgeKinematics for Uniform {
    fn edge_speed(&self, _: EdgeId) -> f64 {
        self.speed
    }

    fn edge_length(&self, _: EdgeId) -> f64 {
        self.length
    }
}

/// Line 0 ↔ 1 ↔ 2, 100 m at 10 m/s per segment.
///
/// Edges: 0→1 e0, 1→0 e1, 1→2 e2, 2→1 e3.
fn line() -> Topology {
    let mut b = TopologyBuilder::with_vertices(3);
    b.add_road(VertexId(0), VertexId(1), 100.0, 10.0, 5.0);
    b.add_road(VertexId(1), VertexId(2), 100.0, 10.0, 5.0);
    b.build().unwrap()
}

fn exact_state(topology: Topology) -> NetworkState {
    NetworkState::new(
        Regime::Exact,
        Arc::new(topology),
        LatencyModel::Quartic,
        CountObservation::Exact,
    )
}

fn single_edge_vehicle(topology: &Topology) -> Vehicle {
    Vehicle::new(VehicleId(0), VertexId(0), VertexId(1), vec![EdgeId(0)], Tick(0), 10.0, topology)
        .unwrap()
}

fn steps_to_complete<K: EdgeKinematics>(vehicle: &mut Vehicle, network: &K, dt: f64) -> u64 {
    let mut steps = 0;
    while vehicle.advance(network, dt) == VehicleStatus::Traveling {
        steps += 1;
        assert!(steps < 10_000, "vehicle never completed");
    }
    steps + 1
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod vehicle {
    use super::*;

    #[test]
    fn new_vehicle_at_path_start() {
        let topo = line();
        let v = Vehicle::new(
            VehicleId(3),
            VertexId(0),
            VertexId(2),
            vec![EdgeId(0), EdgeId(2)],
            Tick(7),
            20.0,
            &topo,
        )
        .unwrap();
        assert_eq!(v.current_edge(), Some(EdgeId(0)));
        assert_eq!(v.progress(), 0.0);
        assert_eq!(v.start(), Tick(7));
        assert_eq!(v.finish(), Tick(7));
        assert_eq!(v.travel_steps(), 0);
        assert_eq!(v.status(), VehicleStatus::Traveling);
    }

    #[test]
    fn empty_path_rejected() {
        let topo = line();
        let err = Vehicle::new(VehicleId(0), VertexId(0), VertexId(0), vec![], Tick(0), 0.0, &topo);
        assert!(matches!(err, Err(VehicleError::EmptyPath(_))));
    }

    #[test]
    fn disconnected_path_rejected() {
        let topo = line();
        // 0→1 then 2→1: head of e0 is 1, tail of e3 is 2.
        let err = Vehicle::new(
            VehicleId(0),
            VertexId(0),
            VertexId(1),
            vec![EdgeId(0), EdgeId(3)],
            Tick(0),
            0.0,
            &topo,
        );
        assert!(matches!(err, Err(VehicleError::DisconnectedPath { position: 0, .. })));
    }

    #[test]
    fn single_edge_completes_after_ceil_steps() {
        let topo = line();
        for (length, speed, dt) in [(100.0, 10.0, 3.0), (100.0, 10.0, 2.5), (90.0, 3.0, 10.0), (1_000.0, 12.5, 10.0)] {
            let mut v = single_edge_vehicle(&topo);
            let steps = steps_to_complete(&mut v, &Uniform { speed, length }, dt);
            let expected = (length / (dt * speed) - 1e-9).ceil() as u64;
            assert_eq!(steps, expected, "L={length} v={speed} dt={dt}");
            assert_eq!(v.travel_steps(), expected);
        }
    }

    #[test]
    fn progress_resets_on_edge_change() {
        let topo = line();
        let mut v = Vehicle::new(
            VehicleId(0),
            VertexId(0),
            VertexId(2),
            vec![EdgeId(0), EdgeId(2)],
            Tick(0),
            0.0,
            &topo,
        )
        .unwrap();
        let net = Uniform { speed: 10.0, length: 100.0 };

        assert_eq!(v.advance(&net, 6.0), VehicleStatus::Traveling);
        assert!((v.progress() - 0.6).abs() < 1e-12);
        // Overshoot to 1.2 is dropped.
        assert_eq!(v.advance(&net, 6.0), VehicleStatus::Traveling);
        assert_eq!(v.current_edge(), Some(EdgeId(2)));
        assert_eq!(v.progress(), 0.0);
    }

    #[test]
    fn completed_vehicle_is_frozen() {
        let topo = line();
        let mut v = single_edge_vehicle(&topo);
        let net = Uniform { speed: 10.0, length: 100.0 };
        assert_eq!(v.advance(&net, 10.0), VehicleStatus::Completed);
        assert_eq!(v.current_edge(), None);
        let finish = v.finish();
        assert_eq!(v.advance(&net, 10.0), VehicleStatus::Completed);
        assert_eq!(v.finish(), finish);
        assert_eq!(v.travel_secs(10.0), 10.0);
    }

    #[test]
    fn two_vertex_trip_takes_one_step() {
        let mut b = TopologyBuilder::with_vertices(2);
        b.add_edge(VertexId(0), VertexId(1), 100.0, 10.0, 5.0);
        let mut state = exact_state(b.build().unwrap());
        state.update_latency(std::iter::empty()).unwrap();

        let mut fleet = Fleet::new(Regime::Exact);
        assert_eq!(
            fleet.spawn(VertexId(0), VertexId(1), Tick(0), &mut state).unwrap(),
            Spawn::Spawned(VehicleId(0))
        );
        assert_eq!(fleet.active()[0].estimated_secs(), 10.0);
        assert_eq!(fleet.advance_all(&state, 10.0), 1);
        assert_eq!(fleet.reap(), 1);
        assert_eq!(fleet.completed()[0].travel_steps(), 1);
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fleet {
    use super::*;

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        let a = fleet.spawn(VertexId(0), VertexId(2), Tick(0), &mut state).unwrap();
        let b = fleet.spawn(VertexId(2), VertexId(0), Tick(0), &mut state).unwrap();
        assert_eq!(a, Spawn::Spawned(VehicleId(0)));
        assert_eq!(b, Spawn::Spawned(VehicleId(1)));
        assert_eq!(fleet.spawned_count(), 2);
        assert_eq!(fleet.active()[0].path(), &[EdgeId(0), EdgeId(2)]);
        assert_eq!(fleet.active()[1].path(), &[EdgeId(3), EdgeId(1)]);
        assert_eq!(fleet.active()[0].estimated_secs(), 20.0);
    }

    #[test]
    fn same_vertex_makes_no_vehicle() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        let outcome = fleet.spawn(VertexId(1), VertexId(1), Tick(0), &mut state).unwrap();
        assert_eq!(outcome, Spawn::SameVertex);
        assert_eq!(fleet.active_count(), 0);
        assert_eq!(fleet.spawned_count(), 0);
    }

    #[test]
    fn unreachable_is_skipped() {
        let mut b = TopologyBuilder::with_vertices(2);
        b.add_edge(VertexId(0), VertexId(1), 100.0, 10.0, 5.0);
        let mut state = exact_state(b.build().unwrap());
        let mut fleet = Fleet::new(Regime::Exact);

        let outcome = fleet.spawn(VertexId(1), VertexId(0), Tick(0), &mut state).unwrap();
        assert_eq!(outcome, Spawn::Unreachable);
        assert_eq!(fleet.active_count(), 0);
        assert_eq!(fleet.spawned_count(), 0);
    }

    #[test]
    fn unreachable_trip_uses_up_its_id() {
        let mut b = TopologyBuilder::with_vertices(2);
        b.add_edge(VertexId(0), VertexId(1), 100.0, 10.0, 5.0);
        let mut state = exact_state(b.build().unwrap());
        let mut fleet = Fleet::new(Regime::Exact);

        let first = fleet.spawn(VertexId(0), VertexId(1), Tick(0), &mut state).unwrap();
        let skipped = fleet.spawn(VertexId(1), VertexId(0), Tick(0), &mut state).unwrap();
        let same = fleet.spawn(VertexId(1), VertexId(1), Tick(0), &mut state).unwrap();
        let third = fleet.spawn(VertexId(0), VertexId(1), Tick(0), &mut state).unwrap();
        assert_eq!(first, Spawn::Spawned(VehicleId(0)));
        assert_eq!((skipped, same), (Spawn::Unreachable, Spawn::SameVertex));
        assert_eq!(third, Spawn::Spawned(VehicleId(2)));
        assert_eq!(fleet.spawned_count(), 2);
    }

    #[test]
    fn out_of_range_vertex_is_error() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        let err = fleet.spawn(VertexId(0), VertexId(9), Tick(0), &mut state);
        assert!(matches!(err, Err(VehicleError::Network(_))));
    }

    #[test]
    fn occupied_edges_follow_vehicles() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        fleet.spawn(VertexId(0), VertexId(2), Tick(0), &mut state).unwrap();
        fleet.spawn(VertexId(0), VertexId(2), Tick(0), &mut state).unwrap();
        assert_eq!(fleet.occupied_edges().collect::<Vec<_>>(), vec![EdgeId(0), EdgeId(0)]);

        fleet.advance_all(&state, 10.0);
        assert_eq!(fleet.occupied_edges().collect::<Vec<_>>(), vec![EdgeId(2), EdgeId(2)]);

        let report = state.update_latency(fleet.occupied_edges()).unwrap();
        assert_eq!(report.vehicles, 2);
        assert_eq!(state.traffic_count()[2], 2);
    }

    #[test]
    fn advance_all_moves_every_vehicle_and_counts_completions() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        fleet.spawn(VertexId(0), VertexId(1), Tick(0), &mut state).unwrap();
        fleet.spawn(VertexId(0), VertexId(2), Tick(0), &mut state).unwrap();
        fleet.spawn(VertexId(2), VertexId(0), Tick(0), &mut state).unwrap();

        // Half an edge per step.
        let slow = Uniform { speed: 5.0, length: 100.0 };
        assert_eq!(fleet.advance_all(&slow, 10.0), 0);
        assert!(fleet.active().iter().all(|v| (v.progress() - 0.5).abs() < 1e-12));
        assert!(fleet.active().iter().all(|v| v.finish() == Tick(1)));

        assert_eq!(fleet.advance_all(&slow, 10.0), 1);
        assert_eq!(fleet.reap(), 1);
        assert!(fleet.active().iter().all(|v| v.position() == 1 && v.progress() == 0.0));
    }

    #[test]
    fn reap_preserves_vehicle_fields() {
        let mut state = exact_state(line());
        let mut fleet = Fleet::new(Regime::Exact);
        fleet.spawn(VertexId(0), VertexId(1), Tick(4), &mut state).unwrap();
        fleet.spawn(VertexId(0), VertexId(2), Tick(4), &mut state).unwrap();

        assert_eq!(fleet.advance_all(&state, 10.0), 1);
        assert_eq!(fleet.reap(), 1);
        assert_eq!(fleet.active_count(), 1);

        let done = &fleet.completed()[0];
        assert_eq!(done.id(), VehicleId(0));
        assert_eq!(done.origin(), VertexId(0));
        assert_eq!(done.destination(), VertexId(1));
        assert_eq!(done.path(), &[EdgeId(0)]);
        assert_eq!(done.start(), Tick(4));
        assert_eq!(done.finish(), Tick(5));
        assert_eq!(done.estimated_secs(), 10.0);

        fleet.advance_all(&state, 10.0);
        assert_eq!(fleet.reap(), 1);
        assert!(fleet.is_drained());
        assert_eq!(fleet.take_completed().len(), 2);
        assert_eq!(fleet.completed_count(), 0);
    }
}
