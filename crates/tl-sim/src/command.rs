//! Every external action on a running simulation, as data.
//!
//! Front ends (button handlers, key bindings, scripted drivers) build a
//! [`Command`] and hand it to [`Sim::apply`][crate::Sim::apply] instead of
//! reaching into simulation state.

use tl_core::{AgentId, Color, Point, SegmentId};
use tl_network::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a train on an explicit route after validating it.
    Dispatch { label: String, color: Color, route: Route },
    /// Create a train on the router's path between two nodes.
    DispatchShortest { label: String, color: Color, from: String, to: String },
    ToggleBlocked(SegmentId),
    /// Toggle the segment nearest a pointer position, if any is in range.
    ToggleBlockedAt(Point),
    ForceReroute { train: AgentId, route: Route },
    SetNextHop { train: AgentId, node: String },
    TogglePause,
    /// Advance the simulation by the given seconds.
    Tick(f32),
}

/// What a successfully applied [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    Dispatched(AgentId),
    BlockToggled { segment: SegmentId, blocked: bool },
    /// A positional command found nothing within tolerance.
    Missed,
    Rerouted(AgentId),
    HopSet(AgentId),
    Paused(bool),
    Ticked,
}
