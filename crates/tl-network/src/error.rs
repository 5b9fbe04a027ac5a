//! Network-subsystem error type.

use thiserror::Error;

use tl_core::SegmentId;

/// Why a route failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteDefect {
    /// The route has no nodes at all.
    #[error("route is empty")]
    Empty,
    /// The route names a node the network does not know.
    #[error("unknown node {0:?}")]
    UnknownNode(String),
    /// Two consecutive route nodes are not joined by a segment.
    #[error("no segment between {from:?} and {to:?}")]
    NoSegment { from: String, to: String },
}

/// Errors produced by `tl-network`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("invalid route: {0}")]
    InvalidRoute(RouteDefect),

    #[error("no path from {from:?} to {to:?}")]
    UnreachableTarget { from: String, to: String },

    #[error("node {0:?} not found in network")]
    NodeNotFound(String),

    #[error("duplicate node {0:?}")]
    DuplicateNode(String),

    #[error("segment {a:?}-{b:?} already exists")]
    DuplicateSegment { a: String, b: String },

    #[error("segment endpoints must differ, got {0:?} twice")]
    SelfLoop(String),

    #[error("{0} not found in network")]
    SegmentNotFound(SegmentId),

    #[error("network cannot hold more {0}")]
    CapacityExceeded(&'static str),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
