use dprt_core::VehicleId;
use dprt_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("vehicle {0} has an empty path")]
    EmptyPath(VehicleId),

    #[error("vehicle {vehicle}: path is not connected at position {position}")]
    DisconnectedPath { vehicle: VehicleId, position: usize },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
