//! Units of the input and output files.
//!
//! Internally everything is carried in the toolkit convention (mm = 1,
//! ns = 1, MeV = 1, momenta in MeV/c). The unit system only describes how
//! phase-space files are read and how ntuple columns are written.

use serde::Serialize;

/// Internal length unit base: 1 mm.
pub const MM: f64 = 1.0;
/// Internal time unit base: 1 ns.
pub const NS: f64 = 1.0;
/// Internal energy unit base: 1 MeV.
pub const MEV: f64 = 1.0;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UnitParseError {
    #[error("unknown position unit '{0}'")]
    Position(String),
    #[error("unknown momentum unit '{0}'")]
    Momentum(String),
    #[error("unknown time unit '{0}'")]
    Time(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PositionUnit {
    Nm,
    #[default]
    Um,
    Mm,
    Cm,
    M,
}

impl PositionUnit {
    pub fn from_label(label: &str) -> Result<Self, UnitParseError> {
        match label {
            "nm" => Ok(Self::Nm),
            "um" => Ok(Self::Um),
            "mm" => Ok(Self::Mm),
            "cm" => Ok(Self::Cm),
            "m" => Ok(Self::M),
            other => Err(UnitParseError::Position(other.to_owned())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nm => "nm",
            Self::Um => "um",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::M => "m",
        }
    }

    /// Value of one unit in internal length units.
    pub const fn value(self) -> f64 {
        match self {
            Self::Nm => 1.0e-6 * MM,
            Self::Um => 1.0e-3 * MM,
            Self::Mm => MM,
            Self::Cm => 10.0 * MM,
            Self::M => 1.0e3 * MM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MomentumUnit {
    Ev,
    Kev,
    #[default]
    Mev,
    Gev,
    Tev,
}

impl MomentumUnit {
    pub fn from_label(label: &str) -> Result<Self, UnitParseError> {
        match label {
            "eV" => Ok(Self::Ev),
            "keV" => Ok(Self::Kev),
            "MeV" => Ok(Self::Mev),
            "GeV" => Ok(Self::Gev),
            "TeV" => Ok(Self::Tev),
            other => Err(UnitParseError::Momentum(other.to_owned())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ev => "eV",
            Self::Kev => "keV",
            Self::Mev => "MeV",
            Self::Gev => "GeV",
            Self::Tev => "TeV",
        }
    }

    /// Value of one unit in internal energy units (per c for momenta).
    pub const fn value(self) -> f64 {
        match self {
            Self::Ev => 1.0e-6 * MEV,
            Self::Kev => 1.0e-3 * MEV,
            Self::Mev => MEV,
            Self::Gev => 1.0e3 * MEV,
            Self::Tev => 1.0e6 * MEV,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeUnit {
    #[default]
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    pub fn from_label(label: &str) -> Result<Self, UnitParseError> {
        match label {
            "fs" => Ok(Self::Fs),
            "ps" => Ok(Self::Ps),
            "ns" => Ok(Self::Ns),
            "us" => Ok(Self::Us),
            "ms" => Ok(Self::Ms),
            "s" => Ok(Self::S),
            other => Err(UnitParseError::Time(other.to_owned())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fs => "fs",
            Self::Ps => "ps",
            Self::Ns => "ns",
            Self::Us => "us",
            Self::Ms => "ms",
            Self::S => "s",
        }
    }

    pub const fn value(self) -> f64 {
        match self {
            Self::Fs => 1.0e-6 * NS,
            Self::Ps => 1.0e-3 * NS,
            Self::Ns => NS,
            Self::Us => 1.0e3 * NS,
            Self::Ms => 1.0e6 * NS,
            Self::S => 1.0e9 * NS,
        }
    }
}

/// The units phase-space records are read in and ntuple columns written in.
///
/// Defaults are um, MeV/c, and fs. Labels are only configurable before run
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UnitSystem {
    pub position: PositionUnit,
    pub momentum: MomentumUnit,
    pub time: TimeUnit,
}

impl UnitSystem {
    pub fn set_position_unit(&mut self, label: &str) -> Result<(), UnitParseError> {
        self.position = PositionUnit::from_label(label)?;
        Ok(())
    }

    pub fn set_momentum_unit(&mut self, label: &str) -> Result<(), UnitParseError> {
        self.momentum = MomentumUnit::from_label(label)?;
        Ok(())
    }

    pub fn set_time_unit(&mut self, label: &str) -> Result<(), UnitParseError> {
        self.time = TimeUnit::from_label(label)?;
        Ok(())
    }
}
