//! Route replacement while a train is in service.
//!
//! Two operations:
//!
//! - [`Train::force_reroute`] swaps the whole route and sends the train back
//!   to the start of it.  Used for re-dispatch.
//! - [`Train::set_next_hop`] changes only the hop after the train's current
//!   node.  Used for live edits while a train waits at a node.

use tracing::{info, warn};

use tl_network::{Network, Route};

use crate::{HopRejection, Train};

impl Train {
    /// Replace the route unconditionally and restart from its first node.
    ///
    /// Any segment the train occupies is released first, so an abandoned
    /// path never keeps a stale claim.  The new route is not validated.
    pub fn force_reroute(&mut self, network: &mut Network, route: Route) {
        self.release_claim(network);
        info!(train = %self.label, %route, "train force-rerouted");
        self.route = route;
        self.index = 0;
        self.progress = 0.0;
        self.finished = false;
        self.waiting = None;
    }

    /// Make `candidate` the node after the current one, dropping the rest of
    /// the route.
    ///
    /// Requires an unfinished train that is not at its last node, a
    /// candidate different from the current node, both nodes present, and an
    /// unblocked segment between them.  Occupancy does not matter: a train
    /// sent towards an occupied segment simply waits for it.
    ///
    /// Naming the node that already follows is a no-op apart from clearing
    /// the waiting flag.  Changing the hop of a train that is part-way along
    /// a segment is refused, since its claim belongs to the old hop.
    pub fn set_next_hop(&mut self, network: &Network, candidate: &str) -> Result<(), HopRejection> {
        let result = self.check_next_hop(network, candidate);
        match &result {
            Ok(()) => {
                if self.next_node() != Some(candidate) {
                    self.route.replace_after(self.index, candidate);
                    info!(train = %self.label, next = candidate, "next hop replaced");
                }
                self.waiting = None;
            }
            Err(reason) => warn!(train = %self.label, candidate, %reason, "next hop rejected"),
        }
        result
    }

    fn check_next_hop(&self, network: &Network, candidate: &str) -> Result<(), HopRejection> {
        if self.finished {
            return Err(HopRejection::Finished);
        }
        if self.at_terminus() {
            return Err(HopRejection::AtTerminus);
        }
        let current = self.current_node().ok_or(HopRejection::AtTerminus)?;
        if candidate == current {
            return Err(HopRejection::SameNode);
        }

        let cur = network
            .node_id(current)
            .ok_or_else(|| HopRejection::UnknownNode(current.to_owned()))?;
        let next = network
            .node_id(candidate)
            .ok_or_else(|| HopRejection::UnknownNode(candidate.to_owned()))?;
        let seg = network
            .segment_between(cur, next)
            .and_then(|sid| network.segment(sid))
            .ok_or_else(|| HopRejection::NoSegment {
                from: current.to_owned(),
                to:   candidate.to_owned(),
            })?;
        if seg.is_blocked() {
            return Err(HopRejection::Blocked(candidate.to_owned()));
        }

        if self.next_node() != Some(candidate) && self.claimed.is_some() {
            return Err(HopRejection::MidSegment);
        }
        Ok(())
    }
}
