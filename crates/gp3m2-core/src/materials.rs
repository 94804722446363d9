//! Static material catalog.
//!
//! Materials are looked up by their NIST-style names, the same names target
//! macros pass to `/target/addLayer`. The table covers the materials used by
//! the application's geometries rather than the full NIST database; the
//! engine resolves the same names against its own material store.

use crate::domain::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialState {
    Solid,
    Gas,
    Liquid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub name: &'static str,
    /// Bulk density in g/cm3.
    pub density: f64,
    /// Mean atomic number, used only for logging.
    pub mean_z: f64,
    pub state: MaterialState,
}

const CATALOG: [Material; 14] = [
    // Interstellar-grade vacuum, the world filler.
    Material { name: "G4_Galactic", density: 1.0e-25, mean_z: 1.0, state: MaterialState::Gas },
    Material { name: "G4_Al", density: 2.699, mean_z: 13.0, state: MaterialState::Solid },
    Material { name: "G4_Si", density: 2.33, mean_z: 14.0, state: MaterialState::Solid },
    Material { name: "G4_Ti", density: 4.54, mean_z: 22.0, state: MaterialState::Solid },
    Material { name: "G4_Fe", density: 7.874, mean_z: 26.0, state: MaterialState::Solid },
    Material { name: "G4_Cu", density: 8.96, mean_z: 29.0, state: MaterialState::Solid },
    Material { name: "G4_Ta", density: 16.654, mean_z: 73.0, state: MaterialState::Solid },
    Material { name: "G4_W", density: 19.3, mean_z: 74.0, state: MaterialState::Solid },
    Material { name: "G4_Au", density: 19.32, mean_z: 79.0, state: MaterialState::Solid },
    Material { name: "G4_Pb", density: 11.35, mean_z: 82.0, state: MaterialState::Solid },
    Material { name: "G4_C", density: 2.0, mean_z: 6.0, state: MaterialState::Solid },
    Material { name: "G4_MYLAR", density: 1.4, mean_z: 6.7, state: MaterialState::Solid },
    Material { name: "G4_KAPTON", density: 1.42, mean_z: 6.8, state: MaterialState::Solid },
    Material { name: "G4_WATER", density: 1.0, mean_z: 7.42, state: MaterialState::Liquid },
];

pub fn find(name: &str) -> Option<&'static Material> {
    CATALOG.iter().find(|material| material.name == name)
}

pub fn find_or_err(name: &str) -> SimResult<&'static Material> {
    find(name).ok_or_else(|| {
        SimError::input_validation(
            "INPUT.UNKNOWN_MATERIAL",
            format!("unknown material '{}'", name),
        )
    })
}

pub fn catalog() -> &'static [Material] {
    &CATALOG
}
