//! Simulation time model.
//!
//! # Design
//!
//! The external frame loop drives the simulation with a variable time delta
//! (seconds since the previous frame).  `SimClock` accumulates those deltas
//! into elapsed simulated seconds and counts ticks:
//!
//!   elapsed_secs = Σ dt
//!
//! Elapsed time is kept in `f64` so that long runs at 30 ticks per second do
//! not lose precision; per-tick deltas handed to the motion engine are `f32`
//! to match layout coordinates.

use std::fmt;

use crate::TlError;

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Accumulated simulation time plus a tick counter.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds since the start of the run.
    pub elapsed_secs: f64,
    /// Number of completed ticks.
    pub ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt` seconds and count one tick.
    ///
    /// Negative or non-finite deltas are treated as zero so a misbehaving
    /// frame timer can never move time backwards.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_secs += dt as f64;
        }
        self.ticks += 1;
    }

    /// Break elapsed time into (minutes, seconds) for display.
    pub fn elapsed_ms(&self) -> (u64, f64) {
        let total = self.elapsed_secs.max(0.0);
        let minutes = (total / 60.0).floor();
        (minutes as u64, total - minutes * 60.0)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.elapsed_ms();
        write!(f, "T{} ({}m {:04.1}s)", self.ticks, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built by the application crate and passed to the simulation
/// builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Speed given to trains that do not specify one, in layout units per
    /// second.  Default: 80.
    pub default_speed: f32,

    /// Maximum distance between a pointer position and a segment or train
    /// for hit-testing to select it.  Default: 10.
    pub pick_tolerance: f32,

    /// Frame rate the driving loop targets.  Informational for the core; the
    /// driver derives its fixed `dt` from it.  Default: 30.
    pub frame_rate: u32,
}

impl SimConfig {
    /// Fixed per-frame delta implied by `frame_rate`.
    #[inline]
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Reject values that would make motion or hit-testing meaningless.
    pub fn validate(&self) -> Result<(), TlError> {
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(TlError::Config(format!(
                "default_speed must be positive and finite, got {}",
                self.default_speed
            )));
        }
        if !(self.pick_tolerance.is_finite() && self.pick_tolerance >= 0.0) {
            return Err(TlError::Config(format!(
                "pick_tolerance must be non-negative, got {}",
                self.pick_tolerance
            )));
        }
        if self.frame_rate == 0 {
            return Err(TlError::Config("frame_rate must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            default_speed:  80.0,
            pick_tolerance: 10.0,
            frame_rate:     30,
        }
    }
}
