//! station: headless replay of the two-line station layout.
//!
//! Drives the simulation at a fixed 30 FPS frame delta, replays the built-in
//! timetable, and plays a short script of operator commands (manual
//! dispatches and block toggles) the way a UI would issue them.
//!
//! Usage: `station [layout.json [timetable.csv]]`.  Set `RUST_LOG=debug` to
//! see segment claims and releases.

mod layout;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tl_core::{Color, Point, SimClock, SimConfig};
use tl_motion::{MotionState, Train};
use tl_network::Route;
use tl_schedule::load_timetable_csv;
use tl_sim::{Command, Sim, SimBuilder, SimError, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const MAX_SIM_SECS:    f64 = 60.0;
const REPORT_INTERVAL: f64 = 5.0;

// ── Operator script ───────────────────────────────────────────────────────────

/// Commands issued once simulated time passes the given second.
fn operator_script() -> Vec<(f64, Command)> {
    let route = |names: &[&str]| names.iter().copied().collect::<Route>();
    vec![
        (6.0, Command::DispatchShortest {
            label: "Manual1".into(),
            color: Color::rgb(0, 128, 255),
            from:  "CL_A".into(),
            to:    "WL_C".into(),
        }),
        // Click on the CL_J ── CL_C line.
        (7.0, Command::ToggleBlockedAt(Point::new(600.0, 356.0))),
        (9.0, Command::Dispatch {
            label: "Manual2".into(),
            color: Color::rgb(255, 100, 100),
            route: route(&["CL_A", "CL_B2", "CL_J", "CL_C"]),
        }),
        (15.0, Command::ToggleBlockedAt(Point::new(600.0, 354.0))),
        // Rejected: not a valid route.
        (16.0, Command::Dispatch {
            label: "Ghost".into(),
            color: Color::BLACK,
            route: route(&["CL_A", "WL_C"]),
        }),
    ]
}

// ── Console observer ──────────────────────────────────────────────────────────

#[derive(Default)]
struct ConsoleObserver {
    now:      f64,
    spawned:  usize,
    rejected: usize,
    finished: usize,
}

impl SimObserver for ConsoleObserver {
    fn on_tick_start(&mut self, clock: &SimClock) {
        self.now = clock.elapsed_secs;
    }

    fn on_spawn(&mut self, train: &Train) {
        self.spawned += 1;
        println!("[{:>5.1}s] spawn    {:<8} {}", self.now, train.label, train.route());
    }

    fn on_spawn_rejected(&mut self, label: &str, error: &SimError) {
        self.rejected += 1;
        println!("[{:>5.1}s] rejected {label:<8} {error}", self.now);
    }

    fn on_arrival(&mut self, train: &Train, node: &str) {
        println!("[{:>5.1}s] arrive   {:<8} {node}", self.now, train.label);
    }

    fn on_finished(&mut self, train: &Train) {
        self.finished += 1;
        println!(
            "[{:>5.1}s] finish   {:<8} {}",
            self.now,
            train.label,
            train.route().last().unwrap_or("?")
        );
    }

    fn on_terminated(&mut self, train: &Train, stale_node: &str) {
        self.finished += 1;
        println!("[{:>5.1}s] retired  {:<8} {stale_node} left the network", self.now, train.label);
    }
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_trains(sim: &Sim) {
    println!("{:<10} {:<9} {:<8} {:>8}  {}", "Train", "State", "At", "Progress", "Position");
    println!("{}", "-".repeat(56));
    for train in sim.fleet.iter() {
        let state = match train.state() {
            MotionState::Moving   => "moving",
            MotionState::Waiting  => "waiting",
            MotionState::Finished => "finished",
        };
        let pos = train
            .current_position(&sim.network)
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        println!(
            "{:<10} {:<9} {:<8} {:>7.0}%  {}",
            train.label,
            state,
            train.current_node().unwrap_or("-"),
            train.progress() * 100.0,
            pos,
        );
    }
}

fn print_segments(sim: &Sim) {
    for view in sim.segment_views() {
        let Some(seg) = sim.network.segment(view.id) else { continue };
        let name = |id| sim.network.node(id).map_or("?", |n| n.name.as_str());
        println!("  {:<6} -> {:<6}  {:?}  {}", name(seg.n1), name(seg.n2), view.status, view.color);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut args = std::env::args().skip(1);
    let network = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            layout::parse_layout(&json).with_context(|| format!("parsing {path}"))?
        }
        None => layout::builtin_network()?,
    };
    let timetable = match args.next() {
        Some(path) => load_timetable_csv(Path::new(&path)).with_context(|| format!("loading {path}"))?,
        None => layout::builtin_timetable()?,
    };

    println!("=== station: TrainLab headless replay ===");
    println!(
        "Layout: {} nodes, {} segments  |  Timetable: {} entries",
        network.node_count(),
        network.segment_count(),
        timetable.len()
    );
    println!();

    let config = SimConfig::default();
    let dt = config.frame_dt();
    let mut sim = SimBuilder::new(config, network).timetable(timetable).build()?;
    let mut obs = ConsoleObserver::default();

    let mut script = operator_script().into_iter().peekable();
    let mut next_report = REPORT_INTERVAL;
    let t0 = Instant::now();

    while sim.clock.elapsed_secs < MAX_SIM_SECS {
        while let Some((_, command)) = script.next_if(|(at, _)| sim.clock.elapsed_secs >= *at) {
            info!(?command, "operator command");
            if let Err(e) = sim.apply(command, &mut obs) {
                warn!(error = %e, "operator command failed");
                println!("[{:>5.1}s] command failed: {e}", sim.clock.elapsed_secs);
            }
        }

        sim.tick(dt, &mut obs);

        if let Err(e) = sim.verify_occupancy() {
            anyhow::bail!("{} {e}", sim.clock);
        }

        if sim.clock.elapsed_secs >= next_report {
            next_report += REPORT_INTERVAL;
            println!();
            println!("── {} ──", sim.clock);
            print_trains(&sim);
            println!();
        }

        let idle = sim.fleet.active_count() == 0 && sim.timetable.is_exhausted();
        if idle && script.peek().is_none() {
            break;
        }
    }

    println!();
    println!("Simulation complete at {} in {:.3} s wall time", sim.clock, t0.elapsed().as_secs_f64());
    println!(
        "  spawned {}  |  rejected {}  |  finished {}  |  still running {}",
        obs.spawned,
        obs.rejected,
        obs.finished,
        sim.fleet.active_count()
    );
    println!();
    print_trains(&sim);
    println!();
    println!("Segments:");
    print_segments(&sim);

    Ok(())
}
