//! Surface phase-space diagnostics.
//!
//! Records selected particle properties every time a step ends on a
//! geometry boundary with kinetic energy above a configurable limit. One
//! ntuple per shower species (electron, gamma, positron), eight double
//! columns each, written in the configured I/O units.

pub mod ntuple;

use crate::domain::{ParticleKind, SimError, SimResult, StepPoint};
use crate::units::UnitSystem;
use ntuple::{CsvNtuple, ntuple_file_name};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ntuple ids in creation order.
const NTUPLE_SPECIES: [(ParticleKind, &str, &str); 3] = [
    (ParticleKind::Electron, "electron", "Electron phase space"),
    (ParticleKind::Gamma, "gamma", "Gamma phase space"),
    (ParticleKind::Positron, "positron", "Positron phase space"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    output_base: String,
    /// In internal energy units (MeV).
    low_energy_limit: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            output_base: "results".to_string(),
            low_energy_limit: 0.0,
        }
    }
}

impl DiagnosticsConfig {
    pub fn set_output_base(&mut self, base: &str) -> SimResult<()> {
        if base.trim().is_empty() {
            return Err(SimError::input_validation(
                "INPUT.OUTPUT_BASE_NAME",
                "output file base name cannot be empty",
            ));
        }
        self.output_base = base.trim().to_string();
        Ok(())
    }

    pub fn set_low_energy_limit(&mut self, limit_mev: f64) -> SimResult<()> {
        if !limit_mev.is_finite() || limit_mev < 0.0 {
            return Err(SimError::input_validation(
                "INPUT.LOW_ENERGY_LIMIT",
                format!("low energy limit must be >= 0, got {} MeV", limit_mev),
            ));
        }
        self.low_energy_limit = limit_mev;
        Ok(())
    }

    pub fn output_base(&self) -> &str {
        &self.output_base
    }

    pub fn low_energy_limit(&self) -> f64 {
        self.low_energy_limit
    }
}

/// Per-ntuple row counts and file locations, reported at end of run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticsSummary {
    pub files: Vec<PathBuf>,
    pub electron_rows: usize,
    pub gamma_rows: usize,
    pub positron_rows: usize,
}

/// Open diagnostics for one run. Created at begin-of-run, finished at
/// end-of-run; rows can only be filled in between.
pub struct Diagnostics {
    ntuples: Vec<CsvNtuple>,
    files: Vec<PathBuf>,
    units: UnitSystem,
    low_energy_limit: f64,
}

impl Diagnostics {
    /// Opens the three phase-space ntuples under `output_dir`. This serial
    /// driver always writes as worker 0.
    pub fn open(
        config: &DiagnosticsConfig,
        units: UnitSystem,
        output_dir: &Path,
    ) -> SimResult<Self> {
        let columns = phase_space_columns(&units);

        let mut ntuples = Vec::with_capacity(NTUPLE_SPECIES.len());
        let mut files = Vec::with_capacity(NTUPLE_SPECIES.len());
        for (_, name, title) in NTUPLE_SPECIES {
            let path = output_dir.join(ntuple_file_name(config.output_base(), name, 0));
            let ntuple = CsvNtuple::create(&path, title, &columns).map_err(|source| {
                SimError::io_system(
                    "IO.NTUPLE_CREATE",
                    format!("failed to create ntuple file '{}': {}", path.display(), source),
                )
            })?;
            ntuples.push(ntuple);
            files.push(path);
        }

        Ok(Self {
            ntuples,
            files,
            units,
            low_energy_limit: config.low_energy_limit(),
        })
    }

    /// Fills the matching ntuple when the step point passes the export
    /// condition: on a geometry boundary, above the energy limit, and a
    /// shower species. Everything else is silently skipped.
    pub fn record(&mut self, point: &StepPoint) -> SimResult<()> {
        if !point.at_boundary || point.kinetic_energy <= self.low_energy_limit {
            return Ok(());
        }

        let Some(ntuple_id) = NTUPLE_SPECIES
            .iter()
            .position(|(kind, _, _)| *kind == point.kind)
        else {
            return Ok(());
        };

        let r_unit = self.units.position.value();
        let p_unit = self.units.momentum.value();
        let t_unit = self.units.time.value();

        let row = [
            point.weight,
            point.position[0] / r_unit,
            point.position[1] / r_unit,
            point.position[2] / r_unit,
            point.momentum[0] / p_unit,
            point.momentum[1] / p_unit,
            point.momentum[2] / p_unit,
            point.global_time / t_unit,
        ];

        self.ntuples[ntuple_id].fill_row(&row).map_err(|source| {
            SimError::io_system(
                "IO.NTUPLE_WRITE",
                format!(
                    "failed to append row to ntuple '{}': {}",
                    self.files[ntuple_id].display(),
                    source
                ),
            )
        })
    }

    /// Flushes and closes all ntuples.
    pub fn finish(self) -> SimResult<DiagnosticsSummary> {
        let summary = DiagnosticsSummary {
            files: self.files.clone(),
            electron_rows: self.ntuples[0].rows(),
            gamma_rows: self.ntuples[1].rows(),
            positron_rows: self.ntuples[2].rows(),
        };

        for (ntuple, path) in self.ntuples.into_iter().zip(&self.files) {
            ntuple.finish().map_err(|source| {
                SimError::io_system(
                    "IO.NTUPLE_CLOSE",
                    format!("failed to close ntuple '{}': {}", path.display(), source),
                )
            })?;
        }

        info!(
            electron_rows = summary.electron_rows,
            gamma_rows = summary.gamma_rows,
            positron_rows = summary.positron_rows,
            "diagnostics written"
        );
        Ok(summary)
    }
}

fn phase_space_columns(units: &UnitSystem) -> Vec<String> {
    let r = units.position.label();
    let p = units.momentum.label();
    let t = units.time.label();
    vec![
        "Weight".to_string(),
        format!("x [{}]", r),
        format!("y [{}]", r),
        format!("z [{}]", r),
        format!("px [{}/c]", p),
        format!("py [{}/c]", p),
        format!("pz [{}/c]", p),
        format!("t [{}]", t),
    ]
}
