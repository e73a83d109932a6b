#![warn(missing_docs)]

//! Planar-orientation slicer for 3+2 axis printing.
//!
//! Given a mesh and a list of reference planes, this crate solves a machine
//! orientation for each plane, slices the mesh in that plane's frame into
//! horizontal contours, and collects the result as an ordered list of
//! setups ready for motion emission.
//!
//! # Example
//!
//! ```ignore
//! use tilt_slicer::{plan_toolpaths, Plane, SliceSettings};
//! use tilt_mesh::{load_stl, MeshObject};
//!
//! let object = MeshObject::new("part", load_stl("part.stl")?);
//! let planes = [Plane::new(Point3::origin(), Vec3::z())];
//! let plan = plan_toolpaths(&object, &planes, &SliceSettings::default())?;
//!
//! println!("Setups: {}", plan.setups.len());
//! ```

pub mod contour;
pub mod error;
pub mod face;
pub mod orientation;
pub mod path;
pub mod planner;
pub mod slice;
pub mod warning;

pub use contour::{build_contours, build_contours_with_limit};
pub use error::{Result, SlicerError};
pub use face::{plane_from_face, planes_from_triangles};
pub use orientation::{
    rotary_angles, solve_orientation, Orientation, Plane, RotaryAngles, MIN_NORMAL_LENGTH,
};
pub use path::Path;
pub use planner::{plan_toolpaths, Setup, ToolpathPlan};
pub use slice::{generate_layer_heights, slice_at_z, slice_layers, Layer};
pub use warning::PlanWarning;

use serde::{Deserialize, Serialize};

/// Slicing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSettings {
    /// Layer height (mm), 0.01 to 2.0.
    pub layer_height: f64,
    /// First work coordinate system index to assign, 1 to 255.
    pub start_wcs_index: u32,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            start_wcs_index: 1,
        }
    }
}

impl SliceSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(0.01..=2.0).contains(&self.layer_height) {
            return Err(SlicerError::InvalidSettings(
                "layer_height must be between 0.01 and 2mm".into(),
            ));
        }
        if !(1..=255).contains(&self.start_wcs_index) {
            return Err(SlicerError::InvalidSettings(
                "start_wcs_index must be between 1 and 255".into(),
            ));
        }
        Ok(())
    }
}
