//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use tl_core::{SimClock, SimConfig};
use tl_motion::Fleet;
use tl_network::{BfsRouter, Network, Router};
use tl_schedule::Timetable;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: default speed, hit-test tolerance, frame rate
/// - [`Network`]: the track layout
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default              |
/// |------------------|----------------------|
/// | `.timetable(t)`  | Empty `Timetable`    |
/// | `.router(r)`     | `BfsRouter::default()` |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default(), network)
///     .timetable(timetable)
///     .router(BfsRouter::avoiding_blocked())
///     .build()?;
/// sim.tick(1.0 / 30.0, &mut NoopObserver);
/// ```
pub struct SimBuilder<R: Router = BfsRouter> {
    config:    SimConfig,
    network:   Network,
    timetable: Option<Timetable>,
    router:    R,
}

impl SimBuilder<BfsRouter> {
    pub fn new(config: SimConfig, network: Network) -> Self {
        Self { config, network, timetable: None, router: BfsRouter::default() }
    }
}

impl<R: Router> SimBuilder<R> {
    /// Supply the spawn timetable.  Entry routes are validated when they
    /// fall due, not here.
    pub fn timetable(mut self, timetable: Timetable) -> Self {
        self.timetable = Some(timetable);
        self
    }

    /// Replace the path-finding engine used by `dispatch_shortest`.
    pub fn router<R2: Router>(self, router: R2) -> SimBuilder<R2> {
        SimBuilder {
            config:    self.config,
            network:   self.network,
            timetable: self.timetable,
            router,
        }
    }

    /// Validate the configuration and return a ready-to-tick [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;
        let timetable = self.timetable.unwrap_or_default();

        info!(
            nodes    = self.network.node_count(),
            segments = self.network.segment_count(),
            entries  = timetable.len(),
            "simulation built"
        );

        Ok(Sim {
            config:    self.config,
            clock:     SimClock::new(),
            network:   self.network,
            fleet:     Fleet::new(),
            timetable,
            router:    self.router,
            paused:    false,
        })
    }
}
