//! One line of the spawn manifest.

use tl_core::Color;
use tl_network::Route;

/// A train the timetable will hand to the simulation once its trigger time
/// has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnEntry {
    /// Unique within a timetable; becomes the spawned train's label.
    pub id: String,

    /// Simulated seconds at or after which the entry fires.
    pub trigger_secs: f64,

    /// Display colour handed to renderers.
    pub color: Color,

    /// Route the spawned train will follow.
    pub route: Route,

    /// Speed override in layout units per second; `None` uses the
    /// simulation's default speed.
    pub speed: Option<f32>,
}

impl SpawnEntry {
    pub fn new(id: &str, trigger_secs: f64, color: Color, route: Route) -> Self {
        Self { id: id.to_owned(), trigger_secs, color, route, speed: None }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// `true` once simulated time has reached the trigger.
    #[inline]
    pub fn is_due(&self, now_secs: f64) -> bool {
        now_secs >= self.trigger_secs
    }
}
