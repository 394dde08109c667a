use dprt_core::CoreError;
use dprt_demand::DemandError;
use dprt_network::NetworkError;
use dprt_vehicle::VehicleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("vehicle error: {0}")]
    Vehicle(#[from] VehicleError),

    #[error("demand error: {0}")]
    Demand(#[from] DemandError),
}

pub type SimResult<T> = Result<T, SimError>;
