//! Primary-particle source driven by a phase-space file.
//!
//! One primary per event: event `i` re-emits macro-particle record
//! `i mod n`, converted from file units into internal units.

use crate::domain::{ParticleKind, Track};
use crate::input::PhaseSpaceFile;
use crate::units::UnitSystem;

#[derive(Debug, Clone)]
pub struct PrimarySource {
    file: PhaseSpaceFile,
    units: UnitSystem,
    kind: ParticleKind,
}

impl PrimarySource {
    pub fn new(file: PhaseSpaceFile, units: UnitSystem) -> Self {
        Self {
            file,
            units,
            kind: ParticleKind::Electron,
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn number_of_records(&self) -> usize {
        self.file.len()
    }

    pub fn primary_for_event(&self, event_id: usize) -> Track {
        let record = &self.file.records()[event_id % self.file.len()];
        let r_unit = self.units.position.value();
        let p_unit = self.units.momentum.value();
        let t_unit = self.units.time.value();

        Track {
            kind: self.kind,
            weight: record.weight,
            position: record.position.map(|value| value * r_unit),
            momentum: record.momentum.map(|value| value * p_unit),
            global_time: record.time * t_unit,
        }
    }
}
