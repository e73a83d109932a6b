//! Filament feed per printed segment.

use std::f64::consts::PI;

use crate::settings::GcodeSettings;

/// Dimensions at or below this are treated as zero.
const MIN_DIMENSION: f64 = 1e-6;

/// Converts deposited bead volume into filament length.
///
/// A segment of length `L` lays down `L x H x W` of material, which is
/// `L x H x W / (pi (D/2)^2)` of filament, scaled by the multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrusionModel {
    /// Filament diameter D (mm).
    pub filament_diameter: f64,
    /// Bead width W (mm).
    pub line_width: f64,
    /// Flow multiplier.
    pub multiplier: f64,
}

impl ExtrusionModel {
    /// Bead width equals the nozzle diameter.
    pub fn from_settings(settings: &GcodeSettings) -> Self {
        Self {
            filament_diameter: settings.filament_diameter,
            line_width: settings.nozzle_diameter,
            multiplier: settings.extrusion_multiplier,
        }
    }

    /// Filament length for a segment of `length` at bead height `layer_height`.
    pub fn filament_length(&self, length: f64, layer_height: f64) -> f64 {
        if self.filament_diameter <= MIN_DIMENSION
            || self.line_width <= MIN_DIMENSION
            || layer_height <= MIN_DIMENSION
            || length <= 0.0
        {
            return 0.0;
        }
        let radius = self.filament_diameter / 2.0;
        let area = PI * radius * radius;
        length * layer_height * self.line_width / area * self.multiplier
    }
}
