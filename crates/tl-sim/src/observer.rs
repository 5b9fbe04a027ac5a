//! Simulation observer trait for progress reporting and event collection.

use tl_core::SimClock;
use tl_motion::Train;

use crate::SimError;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in the
/// tick.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: arrival printer
///
/// ```rust,ignore
/// struct ArrivalPrinter;
///
/// impl SimObserver for ArrivalPrinter {
///     fn on_finished(&mut self, train: &Train) {
///         println!("{} reached {}", train.label, train.route().last().unwrap_or("?"));
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after the clock has advanced, before spawns are polled.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// A due timetable entry produced a new train.
    fn on_spawn(&mut self, _train: &Train) {}

    /// A due timetable entry was dropped because its route or speed failed
    /// validation.  `label` is the entry id.
    fn on_spawn_rejected(&mut self, _label: &str, _error: &SimError) {}

    /// `train` left a segment and now stands at `node`, which is not the end
    /// of its route.
    fn on_arrival(&mut self, _train: &Train, _node: &str) {}

    /// `train` reached the last node of its route.
    fn on_finished(&mut self, _train: &Train) {}

    /// `train` was retired because its current node left the network.
    fn on_terminated(&mut self, _train: &Train, _stale_node: &str) {}

    /// Called at the end of each tick.  `active` counts unfinished trains.
    fn on_tick_end(&mut self, _clock: &SimClock, _active: usize) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
