//! Machine and material settings for motion emission.

use serde::{Deserialize, Serialize};

use crate::error::{GcodeError, Result};

/// Default program header.
pub const DEFAULT_HEADER: &str = "G21 ; Set units to millimeters\n\
G90 ; Use absolute positioning\n\
M82 ; Use absolute E distances\n\
G92 E0 ; Reset extruder position";

/// Default program footer.
pub const DEFAULT_FOOTER: &str = "M104 S0 ; Turn off extruder heater\n\
M140 S0 ; Turn off bed heater\n\
G91 ; Relative positioning\n\
G1 Z10 F3000 ; Move Z up\n\
G90 ; Absolute positioning\n\
G28 X0 Y0 ; Home X and Y\n\
M84 ; Disable motors";

/// Default script run before each rotary move.
pub const DEFAULT_BEFORE_ORIENTATION: &str =
    "G1 E-{retraction_amount} F{retraction_speed} ; Retract filament\n\
G1 Z{safe_z} F{travel_feedrate} ; Move to safe Z";

/// Default script run after each work offset change.
pub const DEFAULT_AFTER_ORIENTATION: &str =
    "G1 X0 Y0 F{travel_feedrate} ; Move to new WCS origin XY (relative to current WCS)\n\
G1 E{retraction_amount} F{retraction_speed} ; Unretract/Prime filament\n\
G92 E0 ; Reset extruder for this orientation";

/// G-code generation settings.
///
/// Feed rates are in mm/min (deg/min for rotation). Scripts may reference
/// `{safe_z}`, `{travel_feedrate}`, `{print_feedrate}`, `{rotation_feedrate}`,
/// `{retraction_amount}`, `{retraction_speed}` and `{z_hop}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Nozzle diameter, also the extrusion width (mm), 0.1 to 2.0.
    pub nozzle_diameter: f64,
    /// Filament diameter (mm), at least 0.1.
    pub filament_diameter: f64,
    /// Extrusion multiplier, 0.01 to 3.0.
    pub extrusion_multiplier: f64,
    /// Feed rate for extruding moves.
    pub print_feedrate: f64,
    /// Feed rate for travel and Z hops.
    pub travel_feedrate: f64,
    /// Feed rate for rotary moves.
    pub rotation_feedrate: f64,
    /// Retraction length (mm).
    pub retraction_amount: f64,
    /// Retraction feed rate.
    pub retraction_speed: f64,
    /// Z hop between paths (mm); 0 disables.
    pub z_hop_height: f64,
    /// Word letter for the tilt axis.
    pub a_axis_letter: String,
    /// Word letter for the rotation axis.
    pub c_axis_letter: String,
    /// Script emitted at program start.
    pub header: String,
    /// Script emitted at program end.
    pub footer: String,
    /// Script emitted before each rotary move.
    pub before_orientation: String,
    /// Script emitted after each work offset change.
    pub after_orientation: String,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            nozzle_diameter: 0.4,
            filament_diameter: 1.75,
            extrusion_multiplier: 1.0,
            print_feedrate: 1800.0,
            travel_feedrate: 3000.0,
            rotation_feedrate: 5000.0,
            retraction_amount: 2.0,
            retraction_speed: 1800.0,
            z_hop_height: 0.5,
            a_axis_letter: "A".into(),
            c_axis_letter: "C".into(),
            header: DEFAULT_HEADER.into(),
            footer: DEFAULT_FOOTER.into(),
            before_orientation: DEFAULT_BEFORE_ORIENTATION.into(),
            after_orientation: DEFAULT_AFTER_ORIENTATION.into(),
        }
    }
}

impl GcodeSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(0.1..=2.0).contains(&self.nozzle_diameter) {
            return Err(invalid("nozzle_diameter must be between 0.1 and 2mm"));
        }
        if !(self.filament_diameter >= 0.1) {
            return Err(invalid("filament_diameter must be at least 0.1mm"));
        }
        if !(0.01..=3.0).contains(&self.extrusion_multiplier) {
            return Err(invalid("extrusion_multiplier must be between 0.01 and 3"));
        }
        for (name, feed) in [
            ("print_feedrate", self.print_feedrate),
            ("travel_feedrate", self.travel_feedrate),
            ("rotation_feedrate", self.rotation_feedrate),
            ("retraction_speed", self.retraction_speed),
        ] {
            if !(feed >= 1.0) {
                return Err(invalid(&format!("{name} must be at least 1")));
            }
        }
        if !(self.retraction_amount >= 0.0) {
            return Err(invalid("retraction_amount must not be negative"));
        }
        if !(self.z_hop_height >= 0.0) {
            return Err(invalid("z_hop_height must not be negative"));
        }
        for (name, letter) in [
            ("a_axis_letter", &self.a_axis_letter),
            ("c_axis_letter", &self.c_axis_letter),
        ] {
            if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(invalid(&format!("{name} must be a word letter")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GcodeError {
    GcodeError::InvalidSettings(msg.into())
}
