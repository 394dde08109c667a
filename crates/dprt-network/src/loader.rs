//! CSV topology loader.
//!
//! # CSV format
//!
//! Edge table, one row per directed edge; row order defines `EdgeId`:
//!
//! ```csv
//! edge_tail,edge_head,length,speed,capacity
//! 0,1,6.0,0.01,25900.2
//! 1,0,6.0,0.01,25900.2
//! ```
//!
//! Vertex table, one row per vertex.  Indices must be dense `0..n`:
//!
//! ```csv
//! vertex
//! 0
//! 1
//! ```
//!
//! Extra columns in either file are ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dprt_core::VertexId;

use crate::{NetworkError, NetworkResult, Topology, TopologyBuilder};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EdgeRecord {
    edge_tail: u32,
    edge_head: u32,
    length:    f64,
    speed:     f64,
    capacity:  f64,
}

#[derive(Deserialize)]
struct VertexRecord {
    vertex: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Topology`] from edge and vertex CSV files.
///
/// `capacity_scale` multiplies every raw capacity (unit conversion and the
/// capacity scenario are both folded into it by the caller).
pub fn load_topology_csv(
    edges_path:     &Path,
    vertices_path:  &Path,
    capacity_scale: f64,
) -> NetworkResult<Topology> {
    let edges = std::fs::File::open(edges_path)?;
    let vertices = std::fs::File::open(vertices_path)?;
    load_topology_reader(edges, vertices, capacity_scale)
}

/// Like [`load_topology_csv`] but accepts any `Read` sources.
pub fn load_topology_reader<E: Read, V: Read>(
    edges:          E,
    vertices:       V,
    capacity_scale: f64,
) -> NetworkResult<Topology> {
    if !(capacity_scale.is_finite() && capacity_scale > 0.0) {
        return Err(NetworkError::Parse(format!(
            "capacity scale must be positive, got {capacity_scale}"
        )));
    }

    // ── Vertices ──────────────────────────────────────────────────────────
    let mut vertex_ids: Vec<u32> = Vec::new();
    for result in csv::Reader::from_reader(vertices).deserialize::<VertexRecord>() {
        vertex_ids.push(result?.vertex);
    }
    vertex_ids.sort_unstable();
    for (expected, &got) in vertex_ids.iter().enumerate() {
        if got as usize != expected {
            return Err(NetworkError::Parse(format!(
                "vertex indices must be dense from 0: expected {expected}, found {got}"
            )));
        }
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut builder = TopologyBuilder::with_vertices(vertex_ids.len());
    for result in csv::Reader::from_reader(edges).deserialize::<EdgeRecord>() {
        let row = result?;
        builder.add_edge(
            VertexId(row.edge_tail),
            VertexId(row.edge_head),
            row.length,
            row.speed,
            row.capacity * capacity_scale,
        );
    }

    let topology = builder.build()?;
    log::info!(
        "loaded topology: {} vertices, {} edges",
        topology.vertex_count(),
        topology.edge_count()
    );
    Ok(topology)
}
