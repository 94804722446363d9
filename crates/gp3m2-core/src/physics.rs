//! Physics-list selection glue.
//!
//! The interaction models themselves live in the engine; this module only
//! names which pre-built electromagnetic list to use and, for the hand-rolled
//! `simple` list, describes its parameter block and process/model bindings
//! declaratively so the engine can assemble them.

use crate::domain::{ParticleKind, SimError, SimResult};
use crate::units::{MEV, MM};
use serde::Serialize;
use tracing::info;

/// Default production cut: 1 um.
pub const DEFAULT_CUT: f64 = 1.0e-3 * MM;

/// Hand-over energy between the low-energy and standard scattering models.
pub const HIGH_ENERGY_LIMIT: f64 = 100.0 * MEV;

/// Upper applicability limit of the Penelope models; standard models take
/// over above it.
pub const PENELOPE_HIGH_ENERGY_LIMIT: f64 = 1.0e3 * MEV;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EmPhysicsList {
    #[default]
    Penelope,
    Standard,
    Simple,
}

impl EmPhysicsList {
    pub fn from_name(name: &str) -> SimResult<Self> {
        match name {
            "penelope" => Ok(Self::Penelope),
            "standard" => Ok(Self::Standard),
            "simple" => Ok(Self::Simple),
            other => Err(SimError::input_validation(
                "INPUT.UNKNOWN_PHYSICS_LIST",
                format!("unknown physics list name '{}'", other),
            )),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Penelope => "penelope",
            Self::Standard => "standard",
            Self::Simple => "simple",
        }
    }
}

/// Selected list plus the knobs the application sets on every list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsSettings {
    pub list: EmPhysicsList,
    /// Production cut in internal length units.
    pub default_cut: f64,
    pub verbose: u8,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            list: EmPhysicsList::default(),
            default_cut: DEFAULT_CUT,
            verbose: 1,
        }
    }
}

impl PhysicsSettings {
    pub fn select(&mut self, name: &str) -> SimResult<()> {
        self.list = EmPhysicsList::from_name(name)?;
        info!(list = self.list.name(), "physics list changed");
        Ok(())
    }
}

/// Electromagnetic parameter block of the `simple` list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmParameters {
    pub min_energy: f64,
    pub max_energy: f64,
    pub lowest_electron_energy: f64,
    pub bins_per_decade: u32,
    pub msc_range_factor: f64,
    pub msc_step_limit: MscStepLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MscStepLimit {
    UseSafety,
    UseDistanceToBoundary,
}

impl Default for EmParameters {
    fn default() -> Self {
        Self {
            min_energy: 100.0e-6 * MEV,
            max_energy: 1.0e6 * MEV,
            lowest_electron_energy: 100.0e-6 * MEV,
            bins_per_decade: 20,
            msc_range_factor: 0.02,
            msc_step_limit: MscStepLimit::UseDistanceToBoundary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmProcess {
    GammaConversion,
    MultipleScattering,
    Bremsstrahlung,
    CoulombScattering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmModel {
    PenelopeGammaConversion,
    UrbanMsc,
    WentzelVi,
    PenelopeBremsstrahlung,
    CoulombScatteringSingle,
}

/// One model attached to a process, optionally restricted in energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBinding {
    pub model: EmModel,
    pub low_limit: Option<f64>,
    pub high_limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessBinding {
    pub particle: ParticleKind,
    pub process: EmProcess,
    pub models: Vec<ModelBinding>,
}

/// Particles every list constructs.
pub const CONSTRUCTED_PARTICLES: [ParticleKind; 16] = [
    ParticleKind::Gamma,
    ParticleKind::Electron,
    ParticleKind::Positron,
    ParticleKind::MuonPlus,
    ParticleKind::MuonMinus,
    ParticleKind::PionPlus,
    ParticleKind::PionMinus,
    ParticleKind::KaonPlus,
    ParticleKind::KaonMinus,
    ParticleKind::Proton,
    ParticleKind::AntiProton,
    ParticleKind::Deuteron,
    ParticleKind::Triton,
    ParticleKind::He3,
    ParticleKind::Alpha,
    ParticleKind::GenericIon,
];

/// Process table of the `simple` list: Penelope models at low energy,
/// standard scattering models above [`HIGH_ENERGY_LIMIT`].
pub fn simple_process_bindings() -> Vec<ProcessBinding> {
    let msc_models = vec![
        ModelBinding {
            model: EmModel::UrbanMsc,
            low_limit: None,
            high_limit: Some(HIGH_ENERGY_LIMIT),
        },
        ModelBinding {
            model: EmModel::WentzelVi,
            low_limit: Some(HIGH_ENERGY_LIMIT),
            high_limit: None,
        },
    ];
    let coulomb = vec![ModelBinding {
        model: EmModel::CoulombScatteringSingle,
        low_limit: Some(HIGH_ENERGY_LIMIT),
        high_limit: None,
    }];

    vec![
        ProcessBinding {
            particle: ParticleKind::Gamma,
            process: EmProcess::GammaConversion,
            models: vec![ModelBinding {
                model: EmModel::PenelopeGammaConversion,
                low_limit: None,
                high_limit: None,
            }],
        },
        ProcessBinding {
            particle: ParticleKind::Electron,
            process: EmProcess::MultipleScattering,
            models: msc_models.clone(),
        },
        ProcessBinding {
            particle: ParticleKind::Electron,
            process: EmProcess::Bremsstrahlung,
            models: vec![ModelBinding {
                model: EmModel::PenelopeBremsstrahlung,
                low_limit: None,
                high_limit: Some(PENELOPE_HIGH_ENERGY_LIMIT),
            }],
        },
        ProcessBinding {
            particle: ParticleKind::Electron,
            process: EmProcess::CoulombScattering,
            models: coulomb.clone(),
        },
        ProcessBinding {
            particle: ParticleKind::Positron,
            process: EmProcess::MultipleScattering,
            models: msc_models,
        },
        ProcessBinding {
            particle: ParticleKind::Positron,
            process: EmProcess::CoulombScattering,
            models: coulomb,
        },
    ]
}
