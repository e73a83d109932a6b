//! Job configuration file.
//!
//! ```toml
//! faces = [4, 10]
//!
//! [[planes]]
//! center = [0.0, 0.0, 0.0]
//! normal = [0.0, 0.0, 1.0]
//!
//! [slice]
//! layer_height = 0.2
//!
//! [gcode]
//! z_hop_height = 0.0
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tilt_gcode::GcodeSettings;
use tilt_math::{Point3, Vec3};
use tilt_slicer::{Plane, SliceSettings};

/// A reference plane given by coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneEntry {
    /// Point on the plane (world space).
    pub center: [f64; 3],
    /// Plane normal (world space).
    pub normal: [f64; 3],
}

impl PlaneEntry {
    /// Convert to a slicer plane.
    pub fn to_plane(self) -> Plane {
        let [cx, cy, cz] = self.center;
        let [nx, ny, nz] = self.normal;
        Plane::new(Point3::new(cx, cy, cz), Vec3::new(nx, ny, nz))
    }
}

/// Parse `cx,cy,cz,nx,ny,nz`.
pub fn parse_plane(s: &str) -> std::result::Result<PlaneEntry, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    match values[..] {
        [cx, cy, cz, nx, ny, nz] => Ok(PlaneEntry {
            center: [cx, cy, cz],
            normal: [nx, ny, nz],
        }),
        _ => Err(format!(
            "expected 6 comma-separated values (cx,cy,cz,nx,ny,nz), got {}",
            values.len()
        )),
    }
}

/// Everything needed to slice one part.
///
/// Reference planes are taken in order: explicit `planes` first, then the
/// mesh triangles listed in `faces`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Triangle indices used as reference faces.
    pub faces: Vec<usize>,
    /// Explicit reference planes.
    pub planes: Vec<PlaneEntry>,
    /// Slicing parameters.
    pub slice: SliceSettings,
    /// Output parameters.
    pub gcode: GcodeSettings,
}

impl JobConfig {
    /// Read and validate a TOML job file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let job = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(job)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let job: Self = toml::from_str(text)?;
        job.validate()?;
        Ok(job)
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.slice.validate()?;
        self.gcode.validate()?;
        for (i, plane) in self.planes.iter().enumerate() {
            if plane.center.iter().chain(&plane.normal).any(|v| !v.is_finite()) {
                bail!("plane {i} has a non-finite coordinate");
            }
        }
        Ok(())
    }
}
