//! Integration tests for tl-sim.

use tl_core::{AgentId, Color, Point, SimConfig};
use tl_network::{Network, NetworkBuilder, Route};
use tl_schedule::{SpawnEntry, Timetable};

use crate::{NoopObserver, Sim, SimBuilder, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// ```text
///                 D(100,100)
///                   |
///   A(0,0) ── B(100,0) ── C(200,0)        X(500,500)
/// ```
fn test_network() -> Network {
    let mut b = NetworkBuilder::new();
    b.add_station("A", Point::new(0.0, 0.0), 2).unwrap();
    b.add_node("B", Point::new(100.0, 0.0)).unwrap();
    b.add_station("C", Point::new(200.0, 0.0), 1).unwrap();
    b.add_node("D", Point::new(100.0, 100.0)).unwrap();
    b.add_node("X", Point::new(500.0, 500.0)).unwrap();
    b.add_segment("A", "B").unwrap();
    b.add_segment("B", "C").unwrap();
    b.add_segment("B", "D").unwrap();
    b.build()
}

fn config(speed: f32) -> SimConfig {
    SimConfig { default_speed: speed, ..SimConfig::default() }
}

fn sim_with_speed(speed: f32) -> Sim {
    SimBuilder::new(config(speed), test_network()).build().unwrap()
}

fn route(names: &[&str]) -> Route {
    names.iter().copied().collect()
}

fn entry(id: &str, at: f64, names: &[&str]) -> SpawnEntry {
    SpawnEntry::new(id, at, Color::rgb(255, 100, 100), route(names))
}

/// Records observer callbacks as readable strings.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl SimObserver for Recorder {
    fn on_spawn(&mut self, train: &tl_motion::Train) {
        self.events.push(format!("spawn {}", train.label));
    }
    fn on_spawn_rejected(&mut self, label: &str, _error: &crate::SimError) {
        self.events.push(format!("rejected {label}"));
    }
    fn on_arrival(&mut self, train: &tl_motion::Train, node: &str) {
        self.events.push(format!("arrive {} {node}", train.label));
    }
    fn on_finished(&mut self, train: &tl_motion::Train) {
        self.events.push(format!("finish {}", train.label));
    }
    fn on_terminated(&mut self, train: &tl_motion::Train, stale_node: &str) {
        self.events.push(format!("terminate {} {stale_node}", train.label));
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_with_defaults() {
        let sim = SimBuilder::new(SimConfig::default(), test_network()).build().unwrap();
        assert!(sim.fleet.is_empty());
        assert!(sim.timetable.is_empty());
        assert_eq!(sim.clock.ticks, 0);
        assert!(!sim.is_paused());
    }

    #[test]
    fn invalid_config_rejected() {
        let result = SimBuilder::new(config(0.0), test_network()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn custom_router_is_used() {
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .router(tl_network::BfsRouter::avoiding_blocked())
            .build()
            .unwrap();
        let bd = sim.network.find_segment("B", "D").unwrap();
        sim.toggle_blocked(bd).unwrap();
        assert!(sim.dispatch_shortest("T", Color::BLACK, "A", "D").is_err());
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn_tests {
    use super::*;

    #[test]
    fn entry_spawns_when_time_reaches_trigger() {
        let timetable = Timetable::from_entries(vec![entry("T1", 1.0, &["A", "B"])]).unwrap();
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();

        let report = sim.tick(0.5, &mut NoopObserver);
        assert!(report.spawned.is_empty());

        let report = sim.tick(0.5, &mut NoopObserver);
        assert_eq!(report.spawned, vec![AgentId(0)]);
        // Spawned trains move in the tick they appear.
        assert_eq!(
            report.outcomes,
            vec![(AgentId(0), tl_motion::StepOutcome::Moving { progress: 0.5 })]
        );
        assert_eq!(sim.fleet.get(AgentId(0)).unwrap().label, "T1");

        assert!(sim.tick(0.5, &mut NoopObserver).spawned.is_empty());
    }

    #[test]
    fn invalid_manifest_route_never_creates_a_train() {
        let timetable = Timetable::from_entries(vec![entry("BAD", 2.0, &["A", "Nowhere"])]).unwrap();
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        let report = sim.tick(2.5, &mut rec);
        assert_eq!(report.rejected, vec!["BAD".to_string()]);
        assert!(report.spawned.is_empty());
        assert!(sim.timetable.has_fired("BAD"));
        assert_eq!(rec.events, vec!["rejected BAD"]);

        sim.run_ticks(10, 0.5, &mut rec);
        assert!(sim.fleet.is_empty());
        assert!(sim.train_views().is_empty());
        assert_eq!(rec.events.len(), 1);
    }

    #[test]
    fn speed_override_applies() {
        let timetable =
            Timetable::from_entries(vec![entry("SLOW", 0.0, &["A", "B"]).with_speed(50.0)]).unwrap();
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();
        sim.tick(0.5, &mut NoopObserver);
        assert_eq!(sim.fleet.get(AgentId(0)).unwrap().progress(), 0.25);
    }

    #[test]
    fn negative_speed_override_is_rejected() {
        let timetable = Timetable::from_entries(vec![
            entry("N", 0.0, &["A", "B"]).with_speed(-50.0),
            entry("OK", 0.0, &["A", "B"]),
        ])
        .unwrap();
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        let report = sim.tick(0.1, &mut rec);
        assert_eq!(report.rejected, vec!["N".to_string()]);
        assert_eq!(report.spawned, vec![AgentId(0)]);
        assert_eq!(rec.events, vec!["rejected N", "spawn OK"]);

        sim.tick(0.1, &mut rec);
        for train in sim.fleet.iter() {
            assert!((0.0..1.0).contains(&train.progress()), "progress {}", train.progress());
        }
        assert_eq!(sim.fleet.len(), 1);
        sim.verify_occupancy().unwrap();
    }

    #[test]
    fn entries_due_together_spawn_in_manifest_order() {
        let timetable = Timetable::from_entries(vec![
            entry("first", 1.0, &["A", "B"]),
            entry("second", 1.0, &["A", "B"]),
        ])
        .unwrap();
        let mut sim = SimBuilder::new(config(50.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();
        let report = sim.tick(1.0, &mut NoopObserver);
        assert_eq!(report.spawned, vec![AgentId(0), AgentId(1)]);
        assert!(!sim.is_waiting(AgentId(0)).unwrap());
        assert!(sim.is_waiting(AgentId(1)).unwrap());
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch_tests {
    use super::*;
    use crate::SimError;
    use tl_network::{NetworkError, RouteDefect};

    #[test]
    fn unknown_node_rejected_before_creation() {
        let mut sim = sim_with_speed(100.0);
        let err = sim.dispatch("T", Color::BLACK, route(&["A", "Q"])).unwrap_err();
        assert!(matches!(
            err,
            SimError::Network(NetworkError::InvalidRoute(RouteDefect::UnknownNode(ref n))) if n == "Q"
        ));
        assert!(sim.fleet.is_empty());
    }

    #[test]
    fn gap_in_route_rejected() {
        let mut sim = sim_with_speed(100.0);
        let err = sim.dispatch("T", Color::BLACK, route(&["A", "C"])).unwrap_err();
        assert!(matches!(
            err,
            SimError::Network(NetworkError::InvalidRoute(RouteDefect::NoSegment { .. }))
        ));
    }

    #[test]
    fn empty_route_rejected() {
        let mut sim = sim_with_speed(100.0);
        assert!(sim.dispatch("T", Color::BLACK, Route::default()).is_err());
    }

    #[test]
    fn shortest_dispatch_follows_bfs_path() {
        let mut sim = sim_with_speed(100.0);
        let id = sim.dispatch_shortest("T", Color::BLACK, "A", "D").unwrap();
        assert_eq!(sim.fleet.get(id).unwrap().route(), &route(&["A", "B", "D"]));
    }

    #[test]
    fn unreachable_target_skips_dispatch() {
        let mut sim = sim_with_speed(100.0);
        let err = sim.dispatch_shortest("T", Color::BLACK, "A", "X").unwrap_err();
        assert!(matches!(err, SimError::Network(NetworkError::UnreachableTarget { .. })));
        assert!(sim.fleet.is_empty());
    }

    #[test]
    fn single_node_route_finishes_immediately() {
        let mut sim = sim_with_speed(100.0);
        let id = sim.dispatch("T", Color::BLACK, route(&["C"])).unwrap();
        sim.tick(0.1, &mut NoopObserver);
        assert!(sim.fleet.get(id).unwrap().is_finished());
    }
}

// ── Motion scenarios ──────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use tl_motion::{StepOutcome, WaitReason};

    #[test]
    fn single_train_crosses_in_one_second() {
        let mut sim = sim_with_speed(100.0);
        let id = sim.dispatch("T", Color::BLACK, route(&["A", "B"])).unwrap();
        let report = sim.tick(1.0, &mut NoopObserver);
        assert_eq!(report.outcomes, vec![(id, StepOutcome::Finished)]);
        let ab = sim.network.find_segment("A", "B").unwrap();
        assert!(sim.network.segment_is_free(ab));
        sim.verify_occupancy().unwrap();
    }

    #[test]
    fn second_train_waits_for_first() {
        let mut sim = sim_with_speed(50.0);
        let t0 = sim.dispatch("T0", Color::BLACK, route(&["A", "B"])).unwrap();
        let t1 = sim.dispatch("T1", Color::BLACK, route(&["A", "B"])).unwrap();

        sim.tick(1.0, &mut NoopObserver);
        assert!(sim.is_waiting(t1).unwrap());
        assert_eq!(sim.fleet.get(t1).unwrap().wait_reason(), Some(WaitReason::Occupied(t0)));
        sim.verify_occupancy().unwrap();

        sim.tick(1.0, &mut NoopObserver);
        assert!(sim.fleet.get(t0).unwrap().is_finished());
        assert!(!sim.is_waiting(t1).unwrap());
        sim.verify_occupancy().unwrap();

        sim.tick(1.0, &mut NoopObserver);
        assert!(sim.fleet.get(t1).unwrap().is_finished());
    }

    #[test]
    fn block_mid_traverse_lets_occupant_finish() {
        let mut sim = sim_with_speed(50.0);
        let ab = sim.network.find_segment("A", "B").unwrap();
        let t0 = sim.dispatch("T0", Color::BLACK, route(&["A", "B"])).unwrap();
        sim.tick(1.0, &mut NoopObserver);

        assert!(sim.toggle_blocked(ab).unwrap());
        sim.tick(1.0, &mut NoopObserver);
        assert!(sim.fleet.get(t0).unwrap().is_finished());

        let t1 = sim.dispatch("T1", Color::BLACK, route(&["A", "B"])).unwrap();
        sim.tick(1.0, &mut NoopObserver);
        assert_eq!(sim.fleet.get(t1).unwrap().wait_reason(), Some(WaitReason::Blocked));

        assert!(!sim.toggle_blocked(ab).unwrap());
        sim.tick(1.0, &mut NoopObserver);
        assert!(!sim.is_waiting(t1).unwrap());
    }

    #[test]
    fn removed_current_node_terminates_train() {
        let mut sim = sim_with_speed(100.0);
        let mut rec = Recorder::default();
        sim.dispatch("T", Color::BLACK, route(&["A", "B", "C"])).unwrap();
        sim.tick(1.0, &mut rec);
        assert_eq!(sim.current_node(AgentId(0)).unwrap(), Some("B"));

        sim.network.remove_node("B");
        sim.tick(1.0, &mut rec);
        assert!(sim.fleet.get(AgentId(0)).unwrap().is_finished());
        assert_eq!(rec.events, vec!["arrive T B", "terminate T B"]);
        sim.verify_occupancy().unwrap();
    }

    #[test]
    fn observer_sees_arrivals_and_finish() {
        let mut sim = sim_with_speed(100.0);
        let mut rec = Recorder::default();
        sim.apply(
            crate::Command::Dispatch { label: "T".into(), color: Color::BLACK, route: route(&["A", "B", "D"]) },
            &mut rec,
        )
        .unwrap();
        sim.run_ticks(3, 1.0, &mut rec);
        assert_eq!(rec.events, vec!["arrive T B", "finish T"]);
    }
}

// ── Rerouting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute_tests {
    use super::*;
    use crate::SimError;
    use tl_motion::{HopRejection, MotionError};

    #[test]
    fn next_hop_redirects_waiting_train() {
        let mut sim = sim_with_speed(100.0);
        let blocker = sim.dispatch("blocker", Color::BLACK, route(&["C", "B"])).unwrap();
        let t = sim.dispatch("T", Color::BLACK, route(&["A", "B", "C"])).unwrap();
        sim.tick(0.5, &mut NoopObserver); // blocker holds C-B, T half-way along A-B
        sim.tick(0.5, &mut NoopObserver); // blocker finishes; T reaches B
        assert!(sim.fleet.get(blocker).unwrap().is_finished());
        assert_eq!(sim.current_node(t).unwrap(), Some("B"));

        sim.set_next_hop(t, "D").unwrap();
        assert_eq!(sim.fleet.get(t).unwrap().route(), &route(&["A", "B", "D"]));
        sim.tick(1.0, &mut NoopObserver);
        assert!(sim.fleet.get(t).unwrap().is_finished());
    }

    #[test]
    fn blocked_hop_rejected_without_mutation() {
        let mut sim = sim_with_speed(100.0);
        let t = sim.dispatch("T", Color::BLACK, route(&["B", "C"])).unwrap();
        let bd = sim.network.find_segment("B", "D").unwrap();
        sim.toggle_blocked(bd).unwrap();
        let err = sim.set_next_hop(t, "D").unwrap_err();
        assert!(matches!(
            err,
            SimError::Motion(MotionError::HopRejected(HopRejection::Blocked(_)))
        ));
        assert_eq!(sim.fleet.get(t).unwrap().route(), &route(&["B", "C"]));
    }

    #[test]
    fn force_reroute_validates_and_releases() {
        let mut sim = sim_with_speed(100.0);
        let t = sim.dispatch("T", Color::BLACK, route(&["A", "B"])).unwrap();
        sim.tick(0.5, &mut NoopObserver);
        let ab = sim.network.find_segment("A", "B").unwrap();
        assert!(!sim.network.segment_is_free(ab));

        assert!(sim.force_reroute(t, route(&["A", "Q"])).is_err());
        assert!(!sim.network.segment_is_free(ab));

        sim.force_reroute(t, route(&["C", "B", "D"])).unwrap();
        assert!(sim.network.segment_is_free(ab));
        assert_eq!(sim.current_node(t).unwrap(), Some("C"));
        sim.verify_occupancy().unwrap();
    }

    #[test]
    fn unknown_train_reported() {
        let mut sim = sim_with_speed(100.0);
        assert!(matches!(sim.is_waiting(AgentId(3)), Err(SimError::TrainNotFound(_))));
        assert!(matches!(sim.current_node(AgentId(3)), Err(SimError::TrainNotFound(_))));
        assert!(matches!(
            sim.set_next_hop(AgentId(3), "B"),
            Err(SimError::Motion(MotionError::TrainNotFound(_)))
        ));
    }
}

// ── Views, picking, and pause ─────────────────────────────────────────────────

#[cfg(test)]
mod view_tests {
    use super::*;
    use crate::view::{BLOCKED_COLOR, FREE_COLOR, OCCUPIED_COLOR};
    use tl_motion::MotionState;

    #[test]
    fn segment_views_classify_each_segment() {
        let mut sim = sim_with_speed(100.0);
        sim.dispatch("T", Color::BLACK, route(&["A", "B"])).unwrap();
        sim.tick(0.5, &mut NoopObserver);
        let bc = sim.network.find_segment("B", "C").unwrap();
        sim.toggle_blocked(bc).unwrap();

        let views = sim.segment_views();
        assert_eq!(views.len(), 3);
        let color_of = |a: &str, b: &str| {
            let id = sim.network.find_segment(a, b).unwrap();
            views.iter().find(|v| v.id == id).unwrap().color
        };
        assert_eq!(color_of("A", "B"), OCCUPIED_COLOR);
        assert_eq!(color_of("B", "C"), BLOCKED_COLOR);
        assert_eq!(color_of("B", "D"), FREE_COLOR);
    }

    #[test]
    fn train_views_show_active_trains_only() {
        let mut sim = sim_with_speed(100.0);
        sim.dispatch("moving", Color::rgb(0, 128, 255), route(&["A", "B", "C"])).unwrap();
        sim.dispatch("done", Color::BLACK, route(&["D"])).unwrap();
        sim.tick(0.5, &mut NoopObserver);

        let views = sim.train_views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].label, "moving");
        assert_eq!(views[0].pos, Point::new(50.0, 0.0));
        assert_eq!(views[0].state, MotionState::Moving);
        assert_eq!(sim.train_at(Point::new(52.0, 4.0)), Some(views[0].id));
    }

    #[test]
    fn toggle_by_position() {
        let mut sim = sim_with_speed(100.0);
        let ab = sim.network.find_segment("A", "B").unwrap();
        assert_eq!(sim.toggle_blocked_at(Point::new(50.0, 4.0)), Some((ab, true)));
        assert_eq!(sim.toggle_blocked_at(Point::new(50.0, -4.0)), Some((ab, false)));
        assert_eq!(sim.toggle_blocked_at(Point::new(400.0, 300.0)), None);
    }

    #[test]
    fn pause_freezes_time_and_motion() {
        let timetable = Timetable::from_entries(vec![entry("T0", 0.0, &["A", "B"])]).unwrap();
        let mut sim = SimBuilder::new(config(100.0), test_network())
            .timetable(timetable)
            .build()
            .unwrap();
        assert!(sim.toggle_pause());

        let report = sim.tick(0.5, &mut NoopObserver);
        assert_eq!(report.spawned.len(), 1);
        assert!(report.outcomes.is_empty());
        assert_eq!(sim.clock.elapsed_secs, 0.0);
        assert_eq!(sim.clock.ticks, 1);
        assert_eq!(sim.fleet.get(AgentId(0)).unwrap().progress(), 0.0);

        sim.set_paused(false);
        sim.tick(0.5, &mut NoopObserver);
        assert_eq!(sim.fleet.get(AgentId(0)).unwrap().progress(), 0.5);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod command_tests {
    use super::*;
    use crate::{Command, CommandOutcome};

    #[test]
    fn commands_drive_the_sim() {
        let mut sim = sim_with_speed(100.0);
        let mut obs = NoopObserver;

        let out = sim
            .apply(
                Command::DispatchShortest {
                    label: "T".into(),
                    color: Color::BLACK,
                    from:  "A".into(),
                    to:    "C".into(),
                },
                &mut obs,
            )
            .unwrap();
        let CommandOutcome::Dispatched(id) = out else { panic!("unexpected {out:?}") };

        assert_eq!(sim.apply(Command::Tick(1.0), &mut obs).unwrap(), CommandOutcome::Ticked);
        assert_eq!(
            sim.apply(Command::SetNextHop { train: id, node: "D".into() }, &mut obs).unwrap(),
            CommandOutcome::HopSet(id)
        );

        let bd = sim.network.find_segment("B", "D").unwrap();
        assert_eq!(
            sim.apply(Command::ToggleBlocked(bd), &mut obs).unwrap(),
            CommandOutcome::BlockToggled { segment: bd, blocked: true }
        );
        assert_eq!(
            sim.apply(Command::ToggleBlockedAt(Point::new(900.0, 900.0)), &mut obs).unwrap(),
            CommandOutcome::Missed
        );
        assert_eq!(sim.apply(Command::TogglePause, &mut obs).unwrap(), CommandOutcome::Paused(true));
        assert_eq!(
            sim.apply(Command::ForceReroute { train: id, route: route(&["B", "C"]) }, &mut obs)
                .unwrap(),
            CommandOutcome::Rerouted(id)
        );
    }

    #[test]
    fn failed_command_reports_error() {
        let mut sim = sim_with_speed(100.0);
        let cmd = Command::Dispatch { label: "T".into(), color: Color::BLACK, route: route(&["Q"]) };
        assert!(sim.apply(cmd, &mut NoopObserver).is_err());
        assert!(sim.fleet.is_empty());
    }
}

// ── Randomized stress ─────────────────────────────────────────────────────────

#[cfg(test)]
mod stress_tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use tl_core::SegmentId;

    /// `n × n` grid with 40-unit spacing, named `N{row}_{col}`.
    fn grid(n: usize) -> (Network, Vec<String>) {
        let mut b = NetworkBuilder::new();
        let name = |r: usize, c: usize| format!("N{r}_{c}");
        for r in 0..n {
            for c in 0..n {
                b.add_node(&name(r, c), Point::new(c as f32 * 40.0, r as f32 * 40.0)).unwrap();
            }
        }
        for r in 0..n {
            for c in 0..n {
                if c + 1 < n {
                    b.add_segment(&name(r, c), &name(r, c + 1)).unwrap();
                }
                if r + 1 < n {
                    b.add_segment(&name(r, c), &name(r + 1, c)).unwrap();
                }
            }
        }
        let names = (0..n).flat_map(|r| (0..n).map(move |c| format!("N{r}_{c}"))).collect();
        (b.build(), names)
    }

    #[test]
    fn occupancy_holds_under_random_traffic() {
        let mut rng = SmallRng::seed_from_u64(0x7a11);
        let (network, mut names) = grid(5);
        let mut sim = SimBuilder::new(SimConfig::default(), network).build().unwrap();
        let mut dispatched = 0;
        let mut rerouted = 0;
        let mut removed = 0;

        for step in 0..3_000 {
            if step % 15 == 0 {
                let from = &names[rng.gen_range(0..names.len())];
                let to = &names[rng.gen_range(0..names.len())];
                // Fails only once removals have split the grid.
                if sim.dispatch_shortest(&format!("R{step}"), Color::BLACK, from, to).is_ok() {
                    dispatched += 1;
                }
            }
            if rng.gen_bool(0.02) {
                let segments: Vec<SegmentId> = sim.network.segments().map(|(id, _)| id).collect();
                let sid = segments[rng.gen_range(0..segments.len())];
                sim.toggle_blocked(sid).unwrap();
            }
            if !sim.fleet.is_empty() && rng.gen_bool(0.05) {
                let id = AgentId::try_from(rng.gen_range(0..sim.fleet.len())).unwrap();
                let node = &names[rng.gen_range(0..names.len())];
                // Most random hops are rejected; only the invariant matters.
                let _ = sim.set_next_hop(id, node);
            }
            if !sim.fleet.is_empty() && rng.gen_bool(0.03) {
                let id = AgentId::try_from(rng.gen_range(0..sim.fleet.len())).unwrap();
                let from = &names[rng.gen_range(0..names.len())];
                let to = &names[rng.gen_range(0..names.len())];
                if let Ok(route) = tl_network::shortest_path(&sim.network, from, to) {
                    sim.force_reroute(id, route).unwrap();
                    rerouted += 1;
                }
            }
            // Leave the outer ring intact so most of the grid stays connected.
            if step % 700 == 350 {
                let victim = format!("N{}_{}", rng.gen_range(1..4), rng.gen_range(1..4));
                if sim.network.remove_node(&victim).is_some() {
                    names.retain(|n| *n != victim);
                    removed += 1;
                }
            }

            sim.tick(rng.gen_range(0.0..0.1_f32), &mut NoopObserver);

            sim.verify_occupancy().unwrap();
            for t in sim.fleet.iter() {
                assert!((0.0..1.0).contains(&t.progress()), "{} progress {}", t.id, t.progress());
                if t.is_finished() {
                    assert_eq!(t.claimed_segment(), None);
                }
            }
        }
        assert!(dispatched >= 150, "dispatched {dispatched}");
        assert!(rerouted > 0);
        assert!(removed > 0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let (network, names) = grid(4);
            let mut sim = SimBuilder::new(SimConfig::default(), network).build().unwrap();
            for step in 0..600 {
                if step % 20 == 0 {
                    let from = &names[rng.gen_range(0..names.len())];
                    let to = &names[rng.gen_range(0..names.len())];
                    sim.dispatch_shortest("R", Color::BLACK, from, to).unwrap();
                }
                sim.tick(1.0 / 30.0, &mut NoopObserver);
            }
            sim.fleet
                .iter()
                .map(|t| (t.index(), t.progress(), t.is_finished()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}
