//! Serde form of a layout file.
//!
//! # Format
//!
//! ```json
//! {
//!   "nodes": {
//!     "A":  { "x": 50,  "y": 300, "station": true, "platforms": 2 },
//!     "J1": { "x": 300, "y": 300 }
//!   },
//!   "edges": [["A", "J1"]]
//! }
//! ```
//!
//! Reading the file is the application's job; this module only converts the
//! parsed description into a validated [`Network`].  Nodes are inserted in
//! name order (the map is a `BTreeMap`) so adjacency order, and therefore
//! path tie-breaking, does not depend on hash iteration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use tl_core::Point;

use crate::network::{Network, NetworkBuilder, Node};
use crate::NetworkResult;

/// Attributes of one node in a layout file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub station: bool,
    #[serde(default)]
    pub platforms: u32,
}

/// A parsed layout: node attributes keyed by name plus undirected edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub nodes: BTreeMap<String, NodeSpec>,
    #[serde(default)]
    pub edges: Vec<[String; 2]>,
}

impl NetworkDescription {
    /// Build a [`Network`], rejecting edges that name unknown nodes, repeat
    /// an existing pair, or loop back onto the same node.
    pub fn build(&self) -> NetworkResult<Network> {
        let mut b = NetworkBuilder::new();
        for (name, spec) in &self.nodes {
            b.insert_node(Node {
                name:       name.clone(),
                pos:        Point::new(spec.x, spec.y),
                is_station: spec.station,
                platforms:  spec.platforms,
            })?;
        }
        for [a, c] in &self.edges {
            b.add_segment(a, c)?;
        }
        let net = b.build();
        info!(nodes = net.node_count(), segments = net.segment_count(), "network built");
        Ok(net)
    }
}

impl Network {
    /// Shorthand for [`NetworkDescription::build`].
    pub fn from_description(desc: &NetworkDescription) -> NetworkResult<Network> {
        desc.build()
    }
}
