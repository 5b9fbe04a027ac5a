use thiserror::Error;

use tl_core::AgentId;

/// Why a next-hop change was refused.  A refused change mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HopRejection {
    #[error("train has finished its route")]
    Finished,

    #[error("train is already at the last node of its route")]
    AtTerminus,

    #[error("candidate is the train's current node")]
    SameNode,

    #[error("node {0:?} not found in network")]
    UnknownNode(String),

    #[error("no segment between {from:?} and {to:?}")]
    NoSegment { from: String, to: String },

    #[error("segment towards {0:?} is blocked")]
    Blocked(String),

    #[error("train is part-way along a segment")]
    MidSegment,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("{0} not found")]
    TrainNotFound(AgentId),

    #[error("next hop rejected: {0}")]
    HopRejected(#[from] HopRejection),

    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f32),

    #[error("fleet cannot hold more trains")]
    FleetFull,
}

pub type MotionResult<T> = Result<T, MotionError>;
