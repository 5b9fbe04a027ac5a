//! Routes, route validation, and breadth-first routing.
//!
//! # Pluggability
//!
//! `tl-sim` computes paths through the [`Router`] trait, so applications can
//! swap in a weighted or signalling-aware implementation without touching
//! the core.  The default [`BfsRouter`] minimises hop count, which is all a
//! schematic layout needs.

use std::collections::VecDeque;
use std::fmt;

use tl_core::NodeId;

use crate::network::Network;
use crate::{NetworkError, NetworkResult, RouteDefect};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered sequence of node names a train intends to visit.
///
/// Each train owns its route outright.  Edits replace or truncate the whole
/// value; nothing is shared between trains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Route {
    nodes: Vec<String>,
}

impl Route {
    pub fn new(nodes: Vec<String>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node name at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    /// Index of the final node, or `None` for an empty route.
    #[inline]
    pub fn last_index(&self) -> Option<usize> {
        self.nodes.len().checked_sub(1)
    }

    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(String::as_str)
    }

    /// Keep elements `0..=index` and append `node` after them.
    ///
    /// Whatever continued past `index` is discarded.
    pub fn replace_after(&mut self, index: usize, node: &str) {
        self.nodes.truncate(index + 1);
        self.nodes.push(node.to_owned());
    }
}

impl<S: Into<String>> FromIterator<S> for Route {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { nodes: iter.into_iter().map(Into::into).collect() }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nodes.join(" > "))
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Check that every node in `route` exists and each consecutive pair is
/// joined by a segment.
///
/// Blocked or occupied segments still count as connections: validity is
/// about topology, not current availability.
pub fn validate_route(network: &Network, route: &Route) -> NetworkResult<()> {
    if route.is_empty() {
        return Err(NetworkError::InvalidRoute(RouteDefect::Empty));
    }

    let mut ids = Vec::with_capacity(route.len());
    for name in route.iter() {
        let id = network
            .node_id(name)
            .ok_or_else(|| NetworkError::InvalidRoute(RouteDefect::UnknownNode(name.to_owned())))?;
        ids.push(id);
    }

    for (pair, names) in ids.windows(2).zip(route.nodes().windows(2)) {
        if network.segment_between(pair[0], pair[1]).is_none() {
            return Err(NetworkError::InvalidRoute(RouteDefect::NoSegment {
                from: names[0].clone(),
                to:   names[1].clone(),
            }));
        }
    }
    Ok(())
}

impl Network {
    /// Shorthand for [`validate_route`].
    pub fn validate_route(&self, route: &Route) -> NetworkResult<()> {
        validate_route(self, route)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path-finding engine.
///
/// Implementations must be `Send + Sync` so a shared router can serve
/// several simulations.
pub trait Router: Send + Sync {
    /// Compute a route from `start` to `end` (both node names).
    ///
    /// `start == end` yields the single-element route `[start]`.  Unknown
    /// endpoints and disconnected pairs yield
    /// [`NetworkError::UnreachableTarget`].
    fn shortest_path(&self, network: &Network, start: &str, end: &str) -> NetworkResult<Route>;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Unweighted breadth-first search over the undirected track graph.
///
/// Returns a minimum-hop path.  Among equal-length paths the one discovered
/// first wins, where neighbours are visited in segment insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsRouter {
    /// Treat blocked segments as absent.  Off by default: a blocked segment
    /// is usually a temporary condition a dispatched train can wait out.
    pub avoid_blocked: bool,
}

impl BfsRouter {
    pub fn avoiding_blocked() -> Self {
        Self { avoid_blocked: true }
    }
}

impl Router for BfsRouter {
    fn shortest_path(&self, network: &Network, start: &str, end: &str) -> NetworkResult<Route> {
        let unreachable = || NetworkError::UnreachableTarget {
            from: start.to_owned(),
            to:   end.to_owned(),
        };
        let (Some(from), Some(to)) = (network.node_id(start), network.node_id(end)) else {
            return Err(unreachable());
        };
        bfs(network, from, to, self.avoid_blocked).ok_or_else(unreachable)
    }
}

/// Convenience wrapper using the default [`BfsRouter`].
pub fn shortest_path(network: &Network, start: &str, end: &str) -> NetworkResult<Route> {
    BfsRouter::default().shortest_path(network, start, end)
}

// ── BFS internals ─────────────────────────────────────────────────────────────

fn bfs(network: &Network, from: NodeId, to: NodeId, avoid_blocked: bool) -> Option<Route> {
    if from == to {
        return reconstruct(network, &[], from, to);
    }

    // Slot vectors may contain removed nodes; size by the largest live id.
    let slots = network.nodes().map(|(id, _)| id.index() + 1).max().unwrap_or(0);
    // prev[v] = node that discovered v; INVALID for undiscovered nodes.
    let mut prev = vec![NodeId::INVALID; slots];
    let mut seen = vec![false; slots];
    seen[from.index()] = true;

    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for (sid, next) in network.neighbors(node) {
            if seen[next.index()] {
                continue;
            }
            if avoid_blocked && network.segment(sid).is_some_and(|s| s.is_blocked()) {
                continue;
            }
            seen[next.index()] = true;
            prev[next.index()] = node;
            if next == to {
                return reconstruct(network, &prev, from, to);
            }
            queue.push_back(next);
        }
    }
    None
}

fn reconstruct(network: &Network, prev: &[NodeId], from: NodeId, to: NodeId) -> Option<Route> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        if cur == NodeId::INVALID {
            return None;
        }
        path.push(cur);
    }
    path.reverse();
    path.into_iter()
        .map(|id| network.node(id).map(|n| n.name.clone()))
        .collect::<Option<Vec<String>>>()
        .map(Route::new)
}
