//! Built-in network and OD table used when no input files are configured.
//!
//! A 4×4 grid of two-way streets, 400 m blocks.  The two middle avenues are
//! faster with more capacity, so most OD pairs have a short route through
//! the side streets and a longer but quicker arterial route; noisy counts
//! decide which one a vehicle takes.

use dprt_core::VertexId;
use dprt_network::{NetworkResult, Topology, TopologyBuilder};

pub const SIDE: u32 = 4;

const BLOCK_M:           f64 = 400.0;
const STREET_SPEED:      f64 = 8.9;  // ~32 km/h
const STREET_CAPACITY:   f64 = 6.0;
const ARTERIAL_SPEED:    f64 = 15.6; // ~56 km/h
const ARTERIAL_CAPACITY: f64 = 14.0;

fn vertex(row: u32, col: u32) -> VertexId {
    VertexId(row * SIDE + col)
}

fn is_arterial(index: u32) -> bool {
    index == 1 || index == 2
}

/// Build the grid.  Vertex `r * SIDE + c` sits at row `r`, column `c`.
pub fn grid_network() -> NetworkResult<Topology> {
    let mut b = TopologyBuilder::with_vertices((SIDE * SIDE) as usize);
    for row in 0..SIDE {
        for col in 0..SIDE {
            if col + 1 < SIDE {
                let (speed, capacity) = if is_arterial(row) {
                    (ARTERIAL_SPEED, ARTERIAL_CAPACITY)
                } else {
                    (STREET_SPEED, STREET_CAPACITY)
                };
                b.add_road(vertex(row, col), vertex(row, col + 1), BLOCK_M, speed, capacity);
            }
            if row + 1 < SIDE {
                let (speed, capacity) = if is_arterial(col) {
                    (ARTERIAL_SPEED, ARTERIAL_CAPACITY)
                } else {
                    (STREET_SPEED, STREET_CAPACITY)
                };
                b.add_road(vertex(row, col), vertex(row + 1, col), BLOCK_M, speed, capacity);
            }
        }
    }
    b.build()
}

/// Daily OD volumes between the four corners and across the middle.
pub fn grid_demand() -> Vec<(VertexId, VertexId, f64)> {
    let corners = [vertex(0, 0), vertex(0, SIDE - 1), vertex(SIDE - 1, 0), vertex(SIDE - 1, SIDE - 1)];
    let mut rows = Vec::new();
    for &o in &corners {
        for &d in &corners {
            if o != d {
                rows.push((o, d, 9_000.0));
            }
        }
    }
    rows.push((vertex(1, 0), vertex(2, SIDE - 1), 6_000.0));
    rows.push((vertex(2, SIDE - 1), vertex(1, 0), 6_000.0));
    rows
}
