pub mod errors;

pub use errors::{ParserResult, SimError, SimErrorCategory, SimResult};

use std::fmt::{Display, Formatter};

/// Particles the physics lists construct. Only the electromagnetic shower
/// species (e-, gamma, e+) are recorded by the diagnostics; the rest exist so
/// the engine can report them without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Electron,
    Gamma,
    Positron,
    MuonMinus,
    MuonPlus,
    PionMinus,
    PionPlus,
    KaonMinus,
    KaonPlus,
    Proton,
    AntiProton,
    Deuteron,
    Triton,
    He3,
    Alpha,
    GenericIon,
}

impl ParticleKind {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Electron => "e-",
            Self::Gamma => "gamma",
            Self::Positron => "e+",
            Self::MuonMinus => "mu-",
            Self::MuonPlus => "mu+",
            Self::PionMinus => "pi-",
            Self::PionPlus => "pi+",
            Self::KaonMinus => "kaon-",
            Self::KaonPlus => "kaon+",
            Self::Proton => "proton",
            Self::AntiProton => "anti_proton",
            Self::Deuteron => "deuteron",
            Self::Triton => "triton",
            Self::He3 => "He3",
            Self::Alpha => "alpha",
            Self::GenericIon => "GenericIon",
        }
    }
}

impl Display for ParticleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A particle in flight, in internal units (mm, MeV/c, ns). Used both for
/// primaries handed to the engine and for secondaries returned by the
/// track-splitting hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub kind: ParticleKind,
    pub weight: f64,
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    pub global_time: f64,
}

/// Post-step snapshot delivered by the transport engine, in internal units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPoint {
    pub kind: ParticleKind,
    pub weight: f64,
    pub position: [f64; 3],
    pub momentum: [f64; 3],
    pub global_time: f64,
    pub kinetic_energy: f64,
    pub at_boundary: bool,
}
