//! `tl-network`: track graph, segment occupancy, and routing.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`network`]     | `Node`, `Segment`, `Network`, `NetworkBuilder`             |
//! | [`description`] | `NetworkDescription`: serde form of a layout file         |
//! | [`router`]      | `Route`, `Router` trait, `BfsRouter`, `validate_route`     |
//! | [`pick`]        | R-tree hit-testing of segments and nodes                   |
//! | [`error`]       | `NetworkError`, `RouteDefect`, `NetworkResult<T>`          |
//!
//! # Occupancy
//!
//! Every segment carries a single occupancy slot.  The network only offers
//! compare-and-set style [`Network::claim`] / [`Network::release`]; deciding
//! *when* to claim belongs to the motion engine in `tl-motion`.

pub mod description;
pub mod error;
pub mod network;
pub mod pick;
pub mod router;


pub use description::{NetworkDescription, NodeSpec};
pub use error::{NetworkError, NetworkResult, RouteDefect};
pub use network::{Network, NetworkBuilder, Node, Segment, SegmentStatus};
pub use router::{BfsRouter, Route, Router, shortest_path, validate_route};
