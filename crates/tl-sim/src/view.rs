//! Read-only snapshots for renderers.

use tl_core::{AgentId, Color, Point, SegmentId};
use tl_motion::MotionState;
use tl_network::SegmentStatus;

/// Colour of a free segment.
pub const FREE_COLOR: Color = Color::rgb(0, 200, 0);
/// Colour of a segment held by a train.
pub const OCCUPIED_COLOR: Color = Color::rgb(200, 0, 0);
/// Colour of a blocked segment, whether or not a train is still on it.
pub const BLOCKED_COLOR: Color = Color::rgb(50, 50, 50);

/// Display colour for a segment in `status`.
pub fn status_color(status: SegmentStatus) -> Color {
    match status {
        SegmentStatus::Blocked     => BLOCKED_COLOR,
        SegmentStatus::Occupied(_) => OCCUPIED_COLOR,
        SegmentStatus::Free        => FREE_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentView {
    pub id:     SegmentId,
    pub from:   Point,
    pub to:     Point,
    pub status: SegmentStatus,
    pub color:  Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainView {
    pub id:    AgentId,
    pub label: String,
    pub color: Color,
    /// Draw position, interpolated along the current segment.
    pub pos:   Point,
    pub state: MotionState,
}
