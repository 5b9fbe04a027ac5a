//! `tl-sim`: tick orchestrator for the TrainLab track simulator.
//!
//! # Tick loop
//!
//! ```text
//! tick(dt):
//!   ① Clock  : elapsed += dt (0 while paused); ticks += 1
//!   ② Spawn  : for each entry in timetable.check_spawns(elapsed):
//!                 route and speed ok → fleet.spawn        (on_spawn)
//!                 otherwise          → log, drop entry     (on_spawn_rejected)
//!   ③ Motion : fleet.update_all in ascending AgentId order
//!                 (on_arrival / on_finished / on_terminated)
//! ```
//!
//! Everything a front end can do between ticks is a [`Command`], applied
//! with [`Sim::apply`].  Renderers read [`Sim::segment_views`] and
//! [`Sim::train_views`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tl_core::SimConfig;
//! use tl_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig::default();
//! let dt = config.frame_dt();
//! let mut sim = SimBuilder::new(config, network).timetable(timetable).build()?;
//! sim.run_ticks(300, dt, &mut NoopObserver);
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod observer;
pub mod sim;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use command::{Command, CommandOutcome};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickReport};
pub use view::{SegmentView, TrainView, status_color};
