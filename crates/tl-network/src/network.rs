//! Track network representation and builder.
//!
//! # Data layout
//!
//! Nodes and segments live in slot vectors indexed by `NodeId` /
//! `SegmentId`.  A slot becomes `None` when its node is removed (and with it
//! every incident segment), so ids held elsewhere never alias a different
//! node or segment.
//!
//! Adjacency is a per-node list of incident `SegmentId`s in insertion order.
//! Breadth-first search walks these lists, so path tie-breaking follows the
//! order segments were added to the builder.
//!
//! Node *names* are the public identity used by layouts and routes; an
//! `FxHashMap` maps them to slots.

use rustc_hash::FxHashMap;
use tracing::debug;

use tl_core::{AgentId, NodeId, Point, SegmentId};

use crate::pick::SpatialIndex;
use crate::{NetworkError, NetworkResult};

// ── Node ──────────────────────────────────────────────────────────────────────

/// A junction or station on the schematic.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name:       String,
    pub pos:        Point,
    pub is_station: bool,
    pub platforms:  u32,
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// Render classification of a segment.  `Blocked` wins over `Occupied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStatus {
    Free,
    Occupied(AgentId),
    Blocked,
}

/// An undirected piece of track between two nodes: the unit of mutual
/// exclusion.
///
/// Only the occupant and the blocked flag change after construction, and only
/// through [`Network`] methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub n1:     NodeId,
    pub n2:     NodeId,
    /// Euclidean length between the endpoint positions.  Zero for coincident
    /// nodes.
    pub length: f32,
    occupant:   Option<AgentId>,
    blocked:    bool,
}

impl Segment {
    #[inline]
    pub fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// No occupant and not blocked.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.occupant.is_none() && !self.blocked
    }

    /// `true` if the segment joins `a` and `b` in either orientation.
    #[inline]
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.n1 == a && self.n2 == b) || (self.n1 == b && self.n2 == a)
    }

    /// The endpoint opposite `node`.
    #[inline]
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.n1 == node { self.n2 } else { self.n1 }
    }

    pub fn status(&self) -> SegmentStatus {
        match (self.blocked, self.occupant) {
            (true, _) => SegmentStatus::Blocked,
            (false, Some(agent)) => SegmentStatus::Occupied(agent),
            (false, None) => SegmentStatus::Free,
        }
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// The track graph plus occupancy state.
///
/// Do not construct directly; use [`NetworkBuilder`] or
/// [`Network::from_description`][crate::NetworkDescription].
pub struct Network {
    nodes:     Vec<Option<Node>>,
    segments:  Vec<Option<Segment>>,
    adjacency: Vec<Vec<SegmentId>>,
    names:     FxHashMap<String, NodeId>,
    spatial:   SpatialIndex,
}

impl Network {
    /// A network with no nodes or segments.
    pub fn empty() -> Self {
        NetworkBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of live segments.
    pub fn segment_count(&self) -> usize {
        self.segments.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Slot of the node called `name`, if it still exists.
    #[inline]
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.node_id(name).and_then(|id| self.node(id))
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Live nodes in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| Some((NodeId::try_from(i).ok()?, n.as_ref()?)))
    }

    /// `(segment, neighbour)` pairs incident to `node`, in insertion order.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (SegmentId, NodeId)> + '_ {
        self.adjacency
            .get(node.index())
            .into_iter()
            .flatten()
            .filter_map(move |&sid| self.segment(sid).map(|s| (sid, s.other(node))))
    }

    /// Remove the node called `name` together with every incident segment.
    ///
    /// Trains whose route still names the node discover it on their next
    /// update (waiting if it was their next hop, terminating if it was their
    /// current node).  Occupancy held on a removed segment vanishes with it.
    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        let id = self.names.remove(name)?;
        let incident = std::mem::take(&mut self.adjacency[id.index()]);
        for sid in incident {
            if let Some(seg) = self.segments[sid.index()].take() {
                let other = seg.other(id);
                self.adjacency[other.index()].retain(|&s| s != sid);
                debug!(segment = %sid, occupant = ?seg.occupant, "segment removed with node");
            }
        }
        let node = self.nodes[id.index()].take();
        self.spatial = SpatialIndex::build(&self.nodes, &self.segments);
        node
    }

    // ── Segments ──────────────────────────────────────────────────────────

    #[inline]
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index()).and_then(Option::as_ref)
    }

    fn segment_mut(&mut self, id: SegmentId) -> NetworkResult<&mut Segment> {
        self.segments
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(NetworkError::SegmentNotFound(id))
    }

    /// Live segments in insertion order.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, s)| Some((SegmentId::try_from(i).ok()?, s.as_ref()?)))
    }

    /// The segment joining `a` and `b` regardless of stored orientation.
    ///
    /// Scans the adjacency list of `a`, so cost is O(degree).
    pub fn segment_between(&self, a: NodeId, b: NodeId) -> Option<SegmentId> {
        self.adjacency.get(a.index())?.iter().copied().find(|&sid| {
            self.segment(sid).is_some_and(|s| s.connects(a, b))
        })
    }

    /// The segment joining the nodes named `a` and `b`, or `None` if either
    /// node is unknown or they are not adjacent.
    pub fn find_segment(&self, a: &str, b: &str) -> Option<SegmentId> {
        self.segment_between(self.node_id(a)?, self.node_id(b)?)
    }

    /// `true` iff the segment exists, has no occupant, and is not blocked.
    pub fn segment_is_free(&self, id: SegmentId) -> bool {
        self.segment(id).is_some_and(Segment::is_free)
    }

    /// Flip the blocked flag and return the new value.
    ///
    /// A train already on the segment keeps its claim and finishes crossing;
    /// the block only stops new entries.
    pub fn toggle_blocked(&mut self, id: SegmentId) -> NetworkResult<bool> {
        let seg = self.segment_mut(id)?;
        seg.blocked = !seg.blocked;
        debug!(segment = %id, blocked = seg.blocked, "segment block toggled");
        Ok(seg.blocked)
    }

    pub fn set_blocked(&mut self, id: SegmentId, blocked: bool) -> NetworkResult<()> {
        self.segment_mut(id)?.blocked = blocked;
        Ok(())
    }

    /// Record `agent` as the occupant of `id`.
    ///
    /// Succeeds when the slot is empty or already held by `agent`; returns
    /// `Ok(false)` when another agent holds it.  The blocked flag is not
    /// consulted: admission is the caller's decision.
    pub fn claim(&mut self, id: SegmentId, agent: AgentId) -> NetworkResult<bool> {
        let seg = self.segment_mut(id)?;
        match seg.occupant {
            Some(holder) if holder != agent => Ok(false),
            Some(_) => Ok(true),
            None => {
                seg.occupant = Some(agent);
                debug!(segment = %id, %agent, "segment claimed");
                Ok(true)
            }
        }
    }

    /// Clear the occupant of `id` if it is `agent`.  Returns whether a claim
    /// was released; a missing segment or a foreign claim is left untouched.
    pub fn release(&mut self, id: SegmentId, agent: AgentId) -> bool {
        match self.segments.get_mut(id.index()).and_then(Option::as_mut) {
            Some(seg) if seg.occupant == Some(agent) => {
                seg.occupant = None;
                debug!(segment = %id, %agent, "segment released");
                true
            }
            _ => false,
        }
    }

    // ── Hit-testing ───────────────────────────────────────────────────────

    /// The segment closest to `pos`, if within `tolerance`.
    pub fn segment_near(&self, pos: Point, tolerance: f32) -> Option<SegmentId> {
        self.spatial.nearest_segment(pos, tolerance)
    }

    /// The node closest to `pos`, if within `tolerance`.
    pub fn node_near(&self, pos: Point, tolerance: f32) -> Option<NodeId> {
        self.spatial.nearest_node(pos, tolerance)
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use tl_core::Point;
/// use tl_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// b.add_node("A", Point::new(0.0, 0.0)).unwrap();
/// b.add_station("B", Point::new(100.0, 0.0), 2).unwrap();
/// b.add_segment("A", "B").unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert!(net.find_segment("B", "A").is_some());
/// ```
pub struct NetworkBuilder {
    nodes:    Vec<Node>,
    names:    FxHashMap<String, NodeId>,
    segments: Vec<(SegmentId, NodeId, NodeId)>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:    Vec::new(),
            names:    FxHashMap::default(),
            segments: Vec::new(),
        }
    }

    /// Add a plain junction.
    pub fn add_node(&mut self, name: &str, pos: Point) -> NetworkResult<NodeId> {
        self.insert_node(Node { name: name.to_owned(), pos, is_station: false, platforms: 0 })
    }

    /// Add a station with `platforms` platforms.
    pub fn add_station(&mut self, name: &str, pos: Point, platforms: u32) -> NetworkResult<NodeId> {
        self.insert_node(Node { name: name.to_owned(), pos, is_station: true, platforms })
    }

    pub fn insert_node(&mut self, node: Node) -> NetworkResult<NodeId> {
        if self.names.contains_key(&node.name) {
            return Err(NetworkError::DuplicateNode(node.name));
        }
        let id = NodeId::try_from(self.nodes.len())
            .map_err(|_| NetworkError::CapacityExceeded("nodes"))?;
        self.names.insert(node.name.clone(), id);
        self.nodes.push(node);
        Ok(id)
    }

    /// Join the nodes named `a` and `b` with an undirected segment.
    pub fn add_segment(&mut self, a: &str, b: &str) -> NetworkResult<SegmentId> {
        let na = self.lookup(a)?;
        let nb = self.lookup(b)?;
        if na == nb {
            return Err(NetworkError::SelfLoop(a.to_owned()));
        }
        let duplicate = self
            .segments
            .iter()
            .any(|&(_, x, y)| (x == na && y == nb) || (x == nb && y == na));
        if duplicate {
            return Err(NetworkError::DuplicateSegment { a: a.to_owned(), b: b.to_owned() });
        }
        let id = SegmentId::try_from(self.segments.len())
            .map_err(|_| NetworkError::CapacityExceeded("segments"))?;
        self.segments.push((id, na, nb));
        Ok(id)
    }

    fn lookup(&self, name: &str) -> NetworkResult<NodeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| NetworkError::NodeNotFound(name.to_owned()))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Consume the builder and produce a [`Network`] with every segment free
    /// and unblocked.
    pub fn build(self) -> Network {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        let segments: Vec<Option<Segment>> = self
            .segments
            .iter()
            .map(|&(sid, n1, n2)| {
                adjacency[n1.index()].push(sid);
                adjacency[n2.index()].push(sid);
                Some(Segment {
                    n1,
                    n2,
                    length:   self.nodes[n1.index()].pos.distance(self.nodes[n2.index()].pos),
                    occupant: None,
                    blocked:  false,
                })
            })
            .collect();

        let nodes: Vec<Option<Node>> = self.nodes.into_iter().map(Some).collect();
        let spatial = SpatialIndex::build(&nodes, &segments);

        Network {
            nodes,
            segments,
            adjacency,
            names: self.names,
            spatial,
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
