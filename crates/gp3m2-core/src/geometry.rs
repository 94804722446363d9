//! Declarative detector geometry: a vacuum world box holding a stack of
//! target layers placed contiguously along +x from the origin.
//!
//! Nothing here navigates geometry; the engine consumes this description.

use crate::domain::{SimError, SimResult};
use crate::materials::{self, Material};
use crate::units::MM;
use tracing::info;

/// World box full size along x: 0.5 cm.
pub const WORLD_SIZE_X: f64 = 5.0 * MM;
/// World box full size along y and z: 1 cm.
pub const WORLD_SIZE_YZ: f64 = 10.0 * MM;
/// Transverse (y, z) full size of every target layer: 1 mm.
pub const LAYER_SIZE_YZ: f64 = 1.0 * MM;

pub const WORLD_MATERIAL: &str = "G4_Galactic";

/// One placed target layer. Widths and centers are in internal units (mm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLayer {
    pub material: &'static Material,
    pub width: f64,
    pub center_x: f64,
    pub copy_number: usize,
}

impl TargetLayer {
    pub fn entry_face(&self) -> f64 {
        self.center_x - 0.5 * self.width
    }

    pub fn exit_face(&self) -> f64 {
        self.center_x + 0.5 * self.width
    }
}

/// The layered target. Layers stack flush against each other starting at
/// x = 0 and may not pass the +x world face.
#[derive(Debug, Clone, Default)]
pub struct TargetStack {
    layers: Vec<TargetLayer>,
    cursor: f64,
}

impl TargetStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer of the named catalog material, `width_um` microns
    /// thick. The layer is placed with its entry face at the current stack
    /// depth; the copy number is the layer index.
    pub fn add_layer(&mut self, material_name: &str, width_um: f64) -> SimResult<()> {
        if !width_um.is_finite() || width_um <= 0.0 {
            return Err(SimError::input_validation(
                "INPUT.LAYER_WIDTH",
                format!("layer width must be positive, got {} um", width_um),
            ));
        }

        let material = materials::find_or_err(material_name)?;
        let width = width_um * 1.0e-3 * MM;

        let exit_face = self.cursor + width;
        if exit_face > 0.5 * WORLD_SIZE_X {
            return Err(SimError::input_validation(
                "INPUT.TARGET_OVERFLOW",
                format!(
                    "layer '{}' ({} um) would end at {:.3} mm, past the world face at {:.3} mm",
                    material_name,
                    width_um,
                    exit_face,
                    0.5 * WORLD_SIZE_X
                ),
            ));
        }

        let layer = TargetLayer {
            material,
            width,
            center_x: self.cursor + 0.5 * width,
            copy_number: self.layers.len(),
        };
        self.cursor = exit_face;
        self.layers.push(layer);

        info!(
            material = material_name,
            width_um,
            layers = self.layers.len(),
            "added target layer"
        );
        Ok(())
    }

    pub fn layers(&self) -> &[TargetLayer] {
        &self.layers
    }

    pub fn number_of_layers(&self) -> usize {
        self.layers.len()
    }

    /// Total stack thickness in internal units.
    pub fn total_thickness(&self) -> f64 {
        self.cursor
    }

    /// The x positions of every layer face, entry and exit, in placement
    /// order. For n layers this yields n + 1 values starting at 0.
    pub fn boundaries(&self) -> Vec<f64> {
        let mut faces = Vec::with_capacity(self.layers.len() + 1);
        faces.push(0.0);
        faces.extend(self.layers.iter().map(TargetLayer::exit_face));
        faces
    }
}

/// The world volume plus the target stack: everything the engine needs to
/// build its navigable geometry.
#[derive(Debug, Clone)]
pub struct DetectorSetup {
    pub world_size_x: f64,
    pub world_size_yz: f64,
    pub world_material: &'static Material,
    pub layer_size_yz: f64,
    pub check_overlaps: bool,
    pub target: TargetStack,
}

impl DetectorSetup {
    pub fn new(target: TargetStack) -> Self {
        Self {
            world_size_x: WORLD_SIZE_X,
            world_size_yz: WORLD_SIZE_YZ,
            world_material: materials::find(WORLD_MATERIAL)
                .expect("world material is in the static catalog"),
            layer_size_yz: LAYER_SIZE_YZ,
            check_overlaps: true,
            target,
        }
    }
}
