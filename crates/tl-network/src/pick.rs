//! Hit-testing index over segments and nodes.
//!
//! Renderers translate a pointer position into "the segment under the
//! cursor" (to toggle a block) or "the node under the cursor" (to choose a
//! next hop).  Both are nearest-neighbour queries in an R-tree (via `rstar`)
//! followed by a tolerance check.
//!
//! The index is rebuilt whole whenever the network topology changes; layouts
//! are small and topology changes rare.

use rstar::primitives::{GeomWithData, Line};
use rstar::{PointDistance, RTree};

use tl_core::{NodeId, Point, SegmentId};

use crate::network::{Node, Segment};

type SegmentEntry = GeomWithData<Line<[f32; 2]>, SegmentId>;
type NodeEntry = GeomWithData<[f32; 2], NodeId>;

/// R-trees over live segments (as line primitives) and live node positions.
pub(crate) struct SpatialIndex {
    segments: RTree<SegmentEntry>,
    nodes:    RTree<NodeEntry>,
}

impl SpatialIndex {
    /// Bulk-load both trees from the network's slot vectors.
    pub(crate) fn build(nodes: &[Option<Node>], segments: &[Option<Segment>]) -> Self {
        let pos = |id: NodeId| nodes[id.index()].as_ref().map(|n| n.pos.to_array());

        let segment_entries: Vec<SegmentEntry> = segments
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let s = s.as_ref()?;
                let line = Line::new(pos(s.n1)?, pos(s.n2)?);
                Some(GeomWithData::new(line, SegmentId::try_from(i).ok()?))
            })
            .collect();

        let node_entries: Vec<NodeEntry> = nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| {
                let n = n.as_ref()?;
                Some(GeomWithData::new(n.pos.to_array(), NodeId::try_from(i).ok()?))
            })
            .collect();

        Self {
            segments: RTree::bulk_load(segment_entries),
            nodes:    RTree::bulk_load(node_entries),
        }
    }

    pub(crate) fn nearest_segment(&self, pos: Point, tolerance: f32) -> Option<SegmentId> {
        let query = pos.to_array();
        self.segments
            .nearest_neighbor(&query)
            .filter(|e| e.distance_2(&query) <= tolerance * tolerance)
            .map(|e| e.data)
    }

    pub(crate) fn nearest_node(&self, pos: Point, tolerance: f32) -> Option<NodeId> {
        let query = pos.to_array();
        self.nodes
            .nearest_neighbor(&query)
            .filter(|e| e.distance_2(&query) <= tolerance * tolerance)
            .map(|e| e.data)
    }
}
