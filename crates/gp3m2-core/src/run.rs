//! Run orchestration and the transport-engine seam.
//!
//! The Monte-Carlo core (tracking, geometry navigation, interaction
//! sampling) is the external toolkit's job. This module defines the trait it
//! is reached through and the serial event loop that feeds it primaries and
//! collects its step points into the diagnostics.

use crate::biasing::BiasingConfig;
use crate::diagnostics::{Diagnostics, DiagnosticsConfig, DiagnosticsSummary};
use crate::domain::{SimError, SimResult, StepPoint, Track};
use crate::geometry::DetectorSetup;
use crate::physics::PhysicsSettings;
use crate::source::PrimarySource;
use crate::units::UnitSystem;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Frozen configuration handed to the engine before the first event.
#[derive(Debug, Clone)]
pub struct RunSetup {
    pub detector: DetectorSetup,
    pub physics: PhysicsSettings,
    pub biasing: BiasingConfig,
}

/// Receives every post-step point the engine produces.
pub trait StepObserver {
    fn post_step(&mut self, point: &StepPoint) -> SimResult<()>;
}

/// The seam to the external transport toolkit.
///
/// Implementations are expected to apply the track-splitting hook in
/// [`RunSetup::biasing`] when they create secondaries.
pub trait TransportEngine {
    fn initialize(&mut self, setup: &RunSetup) -> SimResult<()>;

    fn process_event(
        &mut self,
        primary: Track,
        observer: &mut dyn StepObserver,
    ) -> SimResult<()>;
}

/// Whether a native transport backend is linked into this build. The
/// configuration layer builds and tests without one; `beamOn` then fails
/// with [`engine_unavailable_error`].
pub const fn transport_engine_available() -> bool {
    false
}

pub fn engine_unavailable_error() -> SimError {
    SimError::run(
        "RUN.ENGINE_UNAVAILABLE",
        "no transport engine backend is linked into this build",
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub events: usize,
    pub macro_particles: usize,
    pub diagnostics: DiagnosticsSummary,
}

struct DiagnosticsObserver<'a> {
    diagnostics: &'a mut Diagnostics,
}

impl StepObserver for DiagnosticsObserver<'_> {
    fn post_step(&mut self, point: &StepPoint) -> SimResult<()> {
        self.diagnostics.record(point)
    }
}

/// Drives one run of `n_events` events: opens the diagnostics, initializes
/// the engine with the frozen setup, feeds one primary per event, and closes
/// the output files. The source must already be weight-normalized for
/// `n_events`.
pub fn beam_on(
    engine: &mut dyn TransportEngine,
    setup: &RunSetup,
    source: &PrimarySource,
    diagnostics_config: &DiagnosticsConfig,
    units: UnitSystem,
    output_dir: &Path,
    n_events: usize,
) -> SimResult<RunReport> {
    info!(
        events = n_events,
        macro_particles = source.number_of_records(),
        layers = setup.detector.target.number_of_layers(),
        physics = setup.physics.list.name(),
        "run started"
    );

    let mut diagnostics = Diagnostics::open(diagnostics_config, units, output_dir)?;
    engine.initialize(setup)?;

    {
        let mut observer = DiagnosticsObserver {
            diagnostics: &mut diagnostics,
        };
        for event_id in 0..n_events {
            let primary = source.primary_for_event(event_id);
            engine.process_event(primary, &mut observer)?;
        }
    }

    let summary = diagnostics.finish()?;
    info!(events = n_events, "run complete");

    Ok(RunReport {
        events: n_events,
        macro_particles: source.number_of_records(),
        diagnostics: summary,
    })
}
