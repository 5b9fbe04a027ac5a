//! `tl-motion`: train movement along routes under segment mutual exclusion.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `Train`, `MotionState`, `WaitReason`, `StepOutcome`             |
//! | [`engine`]  | `Train::update` (the per-tick state machine) and `Fleet`        |
//! | [`reroute`] | `force_reroute`, `set_next_hop`                                 |
//! | [`error`]   | `MotionError`, `HopRejection`, `MotionResult<T>`                |
//!
//! # Movement model (claim-then-progress)
//!
//! A train stands at `route[index]` and heads for `route[index + 1]`.
//!
//! 1. Each tick it resolves the segment between those two nodes.  If the
//!    segment is missing, or is blocked or held by another train, the train
//!    is *waiting* and does not move.
//! 2. Otherwise it claims the segment (idempotent) and advances `progress`
//!    by `speed · dt / length`.
//! 3. When `progress ≥ 1` it releases the segment, increments `index`, and
//!    resets `progress` to 0.
//!
//! A claim is released only when the train leaves the segment, so a train
//! already inside a segment always finishes crossing it, even if the segment
//! is blocked behind it.  Trains are updated one at a time in ascending
//! `AgentId` order; the claim order is therefore "first updated wins".

pub mod engine;
pub mod error;
pub mod reroute;
pub mod state;


pub use engine::Fleet;
pub use error::{HopRejection, MotionError, MotionResult};
pub use state::{MotionState, StepOutcome, Train, WaitReason};
