//! `tl-core`: foundational types for the TrainLab track simulator.
//!
//! This crate is a dependency of every other `tl-*` crate.  It has no `tl-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `SegmentId`                  |
//! | [`geo`]     | `Point`, planar distance and interpolation        |
//! | [`color`]   | `Color` (RGB display attribute)                   |
//! | [`time`]    | `SimClock`, `SimConfig`                           |
//! | [`error`]   | `TlError`, `TlResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod color;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use color::Color;
pub use error::{TlError, TlResult};
pub use geo::Point;
pub use ids::{AgentId, NodeId, SegmentId};
pub use time::{SimClock, SimConfig};
