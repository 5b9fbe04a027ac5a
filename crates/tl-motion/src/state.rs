//! Per-train motion state.

use tl_core::{AgentId, Color, Point, SegmentId};
use tl_network::{Network, Route};

// ── Classification enums ──────────────────────────────────────────────────────

/// Coarse state of a train, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Not at the end of its route and not held up on the last update.
    Moving,
    /// Held up on the last update; see [`WaitReason`].
    Waiting,
    /// Reached the final route node, or was terminated.  Terminal.
    Finished,
}

/// Why a train could not enter its next segment this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitReason {
    /// The next route node is not in the network.
    MissingNextNode,
    /// No segment joins the current and next route nodes.
    NoSegment,
    /// The segment is held by another train.
    Occupied(AgentId),
    /// The segment is blocked and this train is not already on it.
    Blocked,
}

/// What a single [`Train::update`] call did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The train had already finished; nothing happened.
    Idle,
    /// The train advanced along its claimed segment without leaving it.
    Moving { progress: f32 },
    /// The train left a segment and now stands at `route[index]`, which is
    /// not the last node.
    Arrived { index: usize },
    /// The train reached the last node of its route this tick.
    Finished,
    /// The train's current node vanished from the network; the train was
    /// retired where it stood.
    Terminated { stale_node: String },
    /// The train could not move.
    Waiting(WaitReason),
}

// ── Train ─────────────────────────────────────────────────────────────────────

/// One simulated train.
///
/// `progress` is the fraction of the segment between `route[index]` and
/// `route[index + 1]` already covered, always in `[0, 1)`.  `claimed` is the
/// segment whose occupancy slot currently names this train; it is `Some`
/// exactly while the train is part-way along that segment.
#[derive(Debug, Clone)]
pub struct Train {
    pub id:    AgentId,
    pub label: String,
    pub color: Color,
    /// Layout units per second.
    pub speed: f32,

    pub(crate) route:    Route,
    pub(crate) index:    usize,
    pub(crate) progress: f32,
    pub(crate) finished: bool,
    pub(crate) waiting:  Option<WaitReason>,
    pub(crate) claimed:  Option<SegmentId>,
}

impl Train {
    /// A train standing at the first node of `route`.
    ///
    /// The route is not validated here; callers that want the guarantee use
    /// [`tl_network::validate_route`] first.
    pub fn new(id: AgentId, label: &str, color: Color, route: Route, speed: f32) -> Self {
        Self {
            id,
            label: label.to_owned(),
            color,
            speed,
            route,
            index:    0,
            progress: 0.0,
            finished: false,
            waiting:  None,
            claimed:  None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Index of the route node the train last stood at.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `true` if the last update could not move the train.
    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    pub fn wait_reason(&self) -> Option<WaitReason> {
        self.waiting
    }

    /// The segment this train currently occupies, if any.
    pub fn claimed_segment(&self) -> Option<SegmentId> {
        self.claimed
    }

    pub fn state(&self) -> MotionState {
        if self.finished {
            MotionState::Finished
        } else if self.waiting.is_some() {
            MotionState::Waiting
        } else {
            MotionState::Moving
        }
    }

    /// Name of the node the train last stood at.
    pub fn current_node(&self) -> Option<&str> {
        self.route.get(self.index)
    }

    /// Name of the node the train is heading for, or `None` at the end of
    /// its route.
    pub fn next_node(&self) -> Option<&str> {
        self.route.get(self.index + 1)
    }

    /// `true` once `index` points at the last route node.
    pub(crate) fn at_terminus(&self) -> bool {
        self.route.last_index().is_none_or(|last| self.index >= last)
    }

    // ── Position ──────────────────────────────────────────────────────────

    /// Draw position: interpolated between the current and next node by
    /// `progress`, or the bare current-node position when finished, at the
    /// last node, or when the next node is missing.
    ///
    /// `None` only when the current node itself is gone from the network.
    pub fn current_position(&self, network: &Network) -> Option<Point> {
        let here = network.node_by_name(self.current_node()?)?.pos;
        if self.finished || self.at_terminus() {
            return Some(here);
        }
        match self.next_node().and_then(|n| network.node_by_name(n)) {
            Some(next) => Some(here.lerp(next.pos, self.progress)),
            None => Some(here),
        }
    }

    // ── Claim bookkeeping ─────────────────────────────────────────────────

    /// Release the occupancy this train holds, if any.
    pub(crate) fn release_claim(&mut self, network: &mut Network) {
        if let Some(sid) = self.claimed.take() {
            network.release(sid, self.id);
        }
    }
}
