//! The per-tick motion state machine and the `Fleet` that drives it.

use tracing::{debug, info, trace, warn};

use tl_core::{AgentId, Color, Point};
use tl_network::{Network, Route};

use crate::{MotionError, MotionResult, StepOutcome, Train, WaitReason};

// ── Train::update ─────────────────────────────────────────────────────────────

impl Train {
    /// Advance this train by `dt` seconds.
    ///
    /// The only writes to shared state are the claim and release of segment
    /// occupancy, and both happen inside this call, so a caller that updates
    /// trains one at a time preserves the one-train-per-segment invariant.
    pub fn update(&mut self, network: &mut Network, dt: f32) -> StepOutcome {
        if self.finished {
            return StepOutcome::Idle;
        }
        self.waiting = None;

        if self.at_terminus() {
            self.finished = true;
            info!(train = %self.label, "train finished");
            return StepOutcome::Finished;
        }

        // `at_terminus` returned false, so both indices are in range.
        let (Some(cur_name), Some(next_name)) = (self.current_node(), self.next_node()) else {
            return StepOutcome::Idle;
        };

        let Some(cur) = network.node_id(cur_name) else {
            let stale_node = cur_name.to_owned();
            self.release_claim(network);
            self.finished = true;
            warn!(train = %self.label, node = %stale_node, "current node left the network; train retired");
            return StepOutcome::Terminated { stale_node };
        };

        let Some(next) = network.node_id(next_name) else {
            return self.wait(network, WaitReason::MissingNextNode);
        };

        let Some(sid) = network.segment_between(cur, next) else {
            return self.wait(network, WaitReason::NoSegment);
        };

        // Admission: free, or already ours (a train on a segment keeps it
        // even if the segment was blocked behind it).
        let (length, occupant, blocked) = match network.segment(sid) {
            Some(seg) => (seg.length, seg.occupant(), seg.is_blocked()),
            None => return self.wait(network, WaitReason::NoSegment),
        };
        match occupant {
            Some(holder) if holder != self.id => {
                return self.wait(network, WaitReason::Occupied(holder));
            }
            None if blocked => return self.wait(network, WaitReason::Blocked),
            _ => {}
        }

        if self.claimed.is_some_and(|held| held != sid) {
            self.release_claim(network);
        }
        // Cannot fail: the slot is empty or already ours.
        if !matches!(network.claim(sid, self.id), Ok(true)) {
            return self.wait(network, WaitReason::NoSegment);
        }
        self.claimed = Some(sid);

        if length <= 0.0 {
            return self.leave_segment(network);
        }

        let step = if dt.is_finite() && dt > 0.0 { self.speed * dt / length } else { 0.0 };
        self.progress += step;

        if self.progress >= 1.0 {
            self.leave_segment(network)
        } else {
            StepOutcome::Moving { progress: self.progress }
        }
    }

    /// Release the claimed segment and stand at the next route node.
    fn leave_segment(&mut self, network: &mut Network) -> StepOutcome {
        self.release_claim(network);
        self.index += 1;
        self.progress = 0.0;

        if self.at_terminus() {
            self.finished = true;
            info!(train = %self.label, "train finished");
            StepOutcome::Finished
        } else {
            debug!(train = %self.label, node = ?self.current_node(), "arrived at node");
            StepOutcome::Arrived { index: self.index }
        }
    }

    fn wait(&mut self, network: &Network, reason: WaitReason) -> StepOutcome {
        // A claim on a segment that was removed with one of its nodes no
        // longer exists; the train falls back to its current node.
        if let Some(sid) = self.claimed {
            if network.segment(sid).is_none() {
                self.claimed = None;
                self.progress = 0.0;
            }
        }
        trace!(train = %self.label, ?reason, "train waiting");
        self.waiting = Some(reason);
        StepOutcome::Waiting(reason)
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// Every train in the simulation, indexed by `AgentId`.
///
/// Trains are never removed: finished trains stay in place so ids remain
/// stable.  Dropping finished trains from the display is the renderer's
/// business.
#[derive(Debug, Default)]
pub struct Fleet {
    trains: Vec<Train>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a train at the start of `route` and return its id.
    ///
    /// A speed that is not finite and positive would drive progress out of
    /// `[0, 1)`, so it is refused before the train exists.
    pub fn spawn(&mut self, label: &str, color: Color, route: Route, speed: f32) -> MotionResult<AgentId> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MotionError::InvalidSpeed(speed));
        }
        let id = AgentId::try_from(self.trains.len()).map_err(|_| MotionError::FleetFull)?;
        self.trains.push(Train::new(id, label, color, route, speed));
        Ok(id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Train> {
        self.trains.get(id.index())
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Train> {
        self.trains.get_mut(id.index())
    }

    fn require_mut(&mut self, id: AgentId) -> MotionResult<&mut Train> {
        self.trains.get_mut(id.index()).ok_or(MotionError::TrainNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Train> + '_ {
        self.trains.iter()
    }

    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Update every unfinished train in ascending id order.
    ///
    /// Returns the outcome of every train that was still active at the start
    /// of the call.
    pub fn update_all(&mut self, network: &mut Network, dt: f32) -> Vec<(AgentId, StepOutcome)> {
        self.trains
            .iter_mut()
            .filter(|t| !t.is_finished())
            .map(|t| (t.id, t.update(network, dt)))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.trains.iter().filter(|t| !t.is_finished()).count()
    }

    pub fn waiting_count(&self) -> usize {
        self.trains.iter().filter(|t| !t.is_finished() && t.is_waiting()).count()
    }

    /// The unfinished train drawn closest to `pos`, if within `tolerance`.
    pub fn train_near(&self, network: &Network, pos: Point, tolerance: f32) -> Option<AgentId> {
        self.trains
            .iter()
            .filter(|t| !t.is_finished())
            .filter_map(|t| t.current_position(network).map(|p| (t.id, p.distance(pos))))
            .filter(|&(_, d)| d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    // ── Rerouting by id ───────────────────────────────────────────────────

    pub fn force_reroute(&mut self, id: AgentId, network: &mut Network, route: Route) -> MotionResult<()> {
        self.require_mut(id)?.force_reroute(network, route);
        Ok(())
    }

    pub fn set_next_hop(&mut self, id: AgentId, network: &Network, candidate: &str) -> MotionResult<()> {
        self.require_mut(id)?.set_next_hop(network, candidate)?;
        Ok(())
    }
}
