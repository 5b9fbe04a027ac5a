use thiserror::Error;

use tl_core::{AgentId, TlError};
use tl_motion::MotionError;
use tl_network::NetworkError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] TlError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("{0} not found")]
    TrainNotFound(AgentId),

    #[error("occupancy invariant violated: {0}")]
    OccupancyViolation(String),
}

pub type SimResult<T> = Result<T, SimError>;
