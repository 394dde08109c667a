use dprt_core::VertexId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("demand parse error: {0}")]
    Parse(String),

    #[error("OD row {row}: vertex {vertex} is outside the network ({count} vertices)")]
    VertexOutOfRange { row: usize, vertex: VertexId, count: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DemandResult<T> = Result<T, DemandError>;
