//! Network-subsystem error type.

use thiserror::Error;

use dprt_core::{EdgeId, VertexId};

/// Errors produced by `dprt-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Path reconstruction hit a vertex pair with no edge between them.
    /// Indicates a malformed topology; never skipped silently.
    #[error("no such edge from {tail} to {head}")]
    NoSuchEdge { tail: VertexId, head: VertexId },

    #[error("no path from {from} to {to} under current latencies")]
    Unreachable { from: VertexId, to: VertexId },

    #[error("{vertex} out of range (network has {count} vertices)")]
    VertexOutOfRange { vertex: VertexId, count: usize },

    #[error("{edge} out of range (network has {count} edges)")]
    EdgeOutOfRange { edge: EdgeId, count: usize },

    #[error("{0} has zero capacity")]
    ZeroCapacity(EdgeId),

    #[error("{edge} is invalid: {reason}")]
    InvalidEdge { edge: EdgeId, reason: String },

    #[error("duplicate edge from {tail} to {head}")]
    DuplicateEdge { tail: VertexId, head: VertexId },

    #[error("{edge} has non-positive or NaN weight {weight}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    #[error("flow table error: {0}")]
    FlowTable(String),

    #[error("latency model error: {0}")]
    Model(String),

    #[error("privacy parameter error: {0}")]
    Privacy(String),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("flow table encoding error: {0}")]
    Codec(#[from] bincode::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
