//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use tl_core::{AgentId, Color, Point, SegmentId, SimClock, SimConfig};
use tl_motion::{Fleet, StepOutcome};
use tl_network::{BfsRouter, Network, Route, Router};
use tl_schedule::Timetable;

use crate::view::{SegmentView, TrainView, status_color};
use crate::{Command, CommandOutcome, SimError, SimObserver, SimResult};

// ── TickReport ────────────────────────────────────────────────────────────────

/// Everything one call to [`Sim::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Trains created from due timetable entries, in manifest order.
    pub spawned:  Vec<AgentId>,
    /// Ids of due timetable entries refused for a bad route or speed.
    pub rejected: Vec<String>,
    /// Outcome of every train that was active this tick, in id order.
    pub outcomes: Vec<(AgentId, StepOutcome)>,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Each [`tick`](Self::tick) runs three phases in order:
///
/// 1. **Clock**: advance simulated time by `dt` (zero while paused).
/// 2. **Spawn**: poll the timetable; validate and dispatch each due entry.
///    Invalid routes and speeds are logged and dropped.
/// 3. **Motion**: update every unfinished train in ascending `AgentId`
///    order.  Skipped while paused.
///
/// Occupancy is only touched in phase 3 and by the rerouting commands, all
/// on the caller's thread, so the one-train-per-segment invariant needs no
/// locking.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router = BfsRouter> {
    pub config: SimConfig,

    /// Simulated time and tick count.
    pub clock: SimClock,

    /// Track layout and segment state.  Mutate segment occupancy only
    /// through the sim; node removal and blocking are safe at any time.
    pub network: Network,

    /// Every train ever created, finished ones included.
    pub fleet: Fleet,

    pub timetable: Timetable,

    pub(crate) router: R,
    pub(crate) paused: bool,
}

impl<R: Router> Sim<R> {
    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds.
    ///
    /// Never fails: rejected spawns and stuck trains are reported through
    /// the returned [`TickReport`] and the observer.
    pub fn tick<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> TickReport {
        let dt = if self.paused { 0.0 } else { dt };
        self.clock.advance(dt);
        observer.on_tick_start(&self.clock);

        let mut report = TickReport::default();

        // ── Spawn phase ───────────────────────────────────────────────────
        for entry in self.timetable.check_spawns(self.clock.elapsed_secs) {
            let speed = entry.speed.unwrap_or(self.config.default_speed);
            match self.spawn_validated(&entry.id, entry.color, entry.route, speed) {
                Ok(id) => {
                    if let Some(train) = self.fleet.get(id) {
                        observer.on_spawn(train);
                    }
                    report.spawned.push(id);
                }
                Err(e) => {
                    warn!(entry = %entry.id, error = %e, "timetable spawn rejected");
                    observer.on_spawn_rejected(&entry.id, &e);
                    report.rejected.push(entry.id);
                }
            }
        }

        // ── Motion phase ──────────────────────────────────────────────────
        if !self.paused {
            report.outcomes = self.fleet.update_all(&mut self.network, dt);
            for (id, outcome) in &report.outcomes {
                let Some(train) = self.fleet.get(*id) else { continue };
                match outcome {
                    StepOutcome::Arrived { index } => {
                        if let Some(node) = train.route().get(*index) {
                            observer.on_arrival(train, node);
                        }
                    }
                    StepOutcome::Finished => observer.on_finished(train),
                    StepOutcome::Terminated { stale_node } => {
                        observer.on_terminated(train, stale_node);
                    }
                    _ => {}
                }
            }
        }

        observer.on_tick_end(&self.clock, self.fleet.active_count());
        report
    }

    /// Run `n` ticks of `dt` seconds each.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, dt: f32, observer: &mut O) {
        for _ in 0..n {
            self.tick(dt, observer);
        }
    }

    // ── Pause ─────────────────────────────────────────────────────────────

    /// While paused, ticks still count and still poll the timetable, but
    /// time does not advance and no train moves.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        info!(paused, "simulation pause changed");
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Create a train on `route` at the configured default speed.
    ///
    /// Fails with `InvalidRoute` before any train exists if the route is
    /// empty, names an unknown node, or has a gap.
    pub fn dispatch(&mut self, label: &str, color: Color, route: Route) -> SimResult<AgentId> {
        let speed = self.config.default_speed;
        self.spawn_validated(label, color, route, speed)
    }

    /// Create a train on the router's path from `from` to `to`.
    pub fn dispatch_shortest(
        &mut self,
        label: &str,
        color: Color,
        from:  &str,
        to:    &str,
    ) -> SimResult<AgentId> {
        let route = self.router.shortest_path(&self.network, from, to).inspect_err(|e| {
            warn!(train = label, from, to, error = %e, "dispatch skipped");
        })?;
        self.dispatch(label, color, route)
    }

    fn spawn_validated(
        &mut self,
        label: &str,
        color: Color,
        route: Route,
        speed: f32,
    ) -> SimResult<AgentId> {
        self.network.validate_route(&route)?;
        let route_str = route.to_string();
        let id = self.fleet.spawn(label, color, route, speed)?;
        info!(train = label, route = %route_str, speed, "train dispatched");
        Ok(id)
    }

    // ── Network edits ─────────────────────────────────────────────────────

    /// Flip the blocked flag of `segment` and return the new value.
    pub fn toggle_blocked(&mut self, segment: SegmentId) -> SimResult<bool> {
        Ok(self.network.toggle_blocked(segment)?)
    }

    /// Toggle the segment nearest `pos` within the configured pick
    /// tolerance.  Returns the segment and its new blocked flag, or `None`
    /// when nothing is in range.
    pub fn toggle_blocked_at(&mut self, pos: Point) -> Option<(SegmentId, bool)> {
        let segment = self.network.segment_near(pos, self.config.pick_tolerance)?;
        let blocked = self.network.toggle_blocked(segment).ok()?;
        Some((segment, blocked))
    }

    // ── Rerouting ─────────────────────────────────────────────────────────

    /// Give `train` a whole new route, starting again from its first node.
    ///
    /// The route is validated like a dispatch route; the train's claim is
    /// released before the swap.
    pub fn force_reroute(&mut self, train: AgentId, route: Route) -> SimResult<()> {
        self.network.validate_route(&route)?;
        self.fleet.force_reroute(train, &mut self.network, route)?;
        Ok(())
    }

    /// Replace the hop after `train`'s current node with `node`.
    pub fn set_next_hop(&mut self, train: AgentId, node: &str) -> SimResult<()> {
        self.fleet.set_next_hop(train, &self.network, node)?;
        Ok(())
    }

    pub fn is_waiting(&self, train: AgentId) -> SimResult<bool> {
        self.fleet
            .get(train)
            .map(|t| t.is_waiting())
            .ok_or(SimError::TrainNotFound(train))
    }

    /// Name of the node `train` last stood at.
    pub fn current_node(&self, train: AgentId) -> SimResult<Option<&str>> {
        self.fleet
            .get(train)
            .map(|t| t.current_node())
            .ok_or(SimError::TrainNotFound(train))
    }

    /// The unfinished train drawn nearest `pos`, within pick tolerance.
    pub fn train_at(&self, pos: Point) -> Option<AgentId> {
        self.fleet.train_near(&self.network, pos, self.config.pick_tolerance)
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Apply one external command.
    pub fn apply<O: SimObserver>(&mut self, command: Command, observer: &mut O) -> SimResult<CommandOutcome> {
        debug!(?command, "applying command");
        let outcome = match command {
            Command::Dispatch { label, color, route } => {
                CommandOutcome::Dispatched(self.dispatch(&label, color, route)?)
            }
            Command::DispatchShortest { label, color, from, to } => {
                CommandOutcome::Dispatched(self.dispatch_shortest(&label, color, &from, &to)?)
            }
            Command::ToggleBlocked(segment) => {
                let blocked = self.toggle_blocked(segment)?;
                CommandOutcome::BlockToggled { segment, blocked }
            }
            Command::ToggleBlockedAt(pos) => match self.toggle_blocked_at(pos) {
                Some((segment, blocked)) => CommandOutcome::BlockToggled { segment, blocked },
                None => CommandOutcome::Missed,
            },
            Command::ForceReroute { train, route } => {
                self.force_reroute(train, route)?;
                CommandOutcome::Rerouted(train)
            }
            Command::SetNextHop { train, node } => {
                self.set_next_hop(train, &node)?;
                CommandOutcome::HopSet(train)
            }
            Command::TogglePause => CommandOutcome::Paused(self.toggle_pause()),
            Command::Tick(dt) => {
                self.tick(dt, observer);
                CommandOutcome::Ticked
            }
        };
        Ok(outcome)
    }

    // ── Render queries ────────────────────────────────────────────────────

    /// Every live segment with its endpoints and display classification.
    pub fn segment_views(&self) -> Vec<SegmentView> {
        self.network
            .segments()
            .filter_map(|(id, seg)| {
                let from = self.network.node(seg.n1)?.pos;
                let to = self.network.node(seg.n2)?.pos;
                let status = seg.status();
                Some(SegmentView { id, from, to, status, color: status_color(status) })
            })
            .collect()
    }

    /// Every unfinished train that can be placed on the layout.
    pub fn train_views(&self) -> Vec<TrainView> {
        self.fleet
            .iter()
            .filter(|t| !t.is_finished())
            .filter_map(|t| {
                Some(TrainView {
                    id:    t.id,
                    label: t.label.clone(),
                    color: t.color,
                    pos:   t.current_position(&self.network)?,
                    state: t.state(),
                })
            })
            .collect()
    }

    // ── Invariant check ───────────────────────────────────────────────────

    /// Confirm that segment occupants and train claims agree.
    ///
    /// Every occupied segment must name an unfinished train whose claim is
    /// that segment, and every claim an unfinished train holds on a live
    /// segment must be recorded there.  Together these imply at most one train per
    /// segment and at most one segment per train.
    pub fn verify_occupancy(&self) -> SimResult<()> {
        for (sid, seg) in self.network.segments() {
            let Some(holder) = seg.occupant() else { continue };
            let train = self.fleet.get(holder).ok_or_else(|| {
                SimError::OccupancyViolation(format!("{sid} held by unknown {holder}"))
            })?;
            if train.is_finished() || train.claimed_segment() != Some(sid) {
                return Err(SimError::OccupancyViolation(format!(
                    "{sid} held by {holder}, whose claim is {:?}",
                    train.claimed_segment()
                )));
            }
        }
        for train in self.fleet.iter().filter(|t| !t.is_finished()) {
            let Some(sid) = train.claimed_segment() else { continue };
            // A claim on a segment removed with its node is dropped on the
            // train's next update.
            let Some(seg) = self.network.segment(sid) else { continue };
            let occupant = seg.occupant();
            if occupant != Some(train.id) {
                return Err(SimError::OccupancyViolation(format!(
                    "{} claims {sid}, which is held by {occupant:?}",
                    train.id
                )));
            }
        }
        Ok(())
    }
}
