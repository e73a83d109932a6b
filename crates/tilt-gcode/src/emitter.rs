//! Toolpath plan to machine motion.
//!
//! The program is laid out as header, then for each setup a rotary move and
//! work offset change wrapped in the before/after scripts followed by its
//! layers, then footer. Extruder position is absolute and carried across the
//! whole program, resynchronised whenever a script sets it.

use serde::{Deserialize, Serialize};
use tilt_math::Point3;
use tilt_slicer::{Layer, Setup, ToolpathPlan};
use tracing::{debug, info, warn};

use crate::command::{GcodeLine, MotionCommand, WorkOffset};
use crate::extrusion::ExtrusionModel;
use crate::script::track_extruder;
use crate::settings::GcodeSettings;
use crate::template::{render, script_lines, TemplateError, TemplateVars};
use crate::warning::EmitWarning;

/// Clearance above the part when Z hop is disabled (mm).
const FALLBACK_CLEARANCE: f64 = 5.0;

/// Safe Z when the part height is unknown (mm).
const FALLBACK_SAFE_Z: f64 = 20.0;

/// Statistics about an emitted program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionStats {
    /// Number of setups.
    pub setups: usize,
    /// Number of layers across setups.
    pub layers: usize,
    /// Travel moves.
    pub travel_moves: usize,
    /// Extruding moves.
    pub extrude_moves: usize,
    /// Filament fed by extruding moves (mm).
    pub filament_mm: f64,
    /// Absolute extruder position at program end.
    pub final_extruder_position: f64,
}

/// An emitted program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionProgram {
    /// Lines in output order.
    pub lines: Vec<GcodeLine>,
    /// Problems absorbed during emission.
    pub warnings: Vec<EmitWarning>,
    /// Summary.
    pub stats: MotionStats,
}

impl MotionProgram {
    /// The program as newline-terminated text.
    pub fn to_gcode(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}

/// Running state while emitting.
#[derive(Debug, Default)]
struct EmitState {
    program: MotionProgram,
    extruder_position: f64,
    last_position: Option<Point3>,
}

impl EmitState {
    fn push(&mut self, command: MotionCommand) {
        self.program.lines.push(GcodeLine::new(command));
    }

    fn push_commented(&mut self, command: MotionCommand, comment: impl Into<String>) {
        self.program
            .lines
            .push(GcodeLine::with_comment(command, comment));
    }

    fn warn(&mut self, warning: EmitWarning) {
        warn!("{warning}");
        self.program.warnings.push(warning);
    }
}

/// Emits machine motion for a toolpath plan.
#[derive(Debug, Clone)]
pub struct MotionEmitter<'a> {
    settings: &'a GcodeSettings,
    extrusion: ExtrusionModel,
}

impl<'a> MotionEmitter<'a> {
    /// Create an emitter. Settings are assumed validated.
    pub fn new(settings: &'a GcodeSettings) -> Self {
        Self {
            settings,
            extrusion: ExtrusionModel::from_settings(settings),
        }
    }

    /// Safe Z for a plan: part top plus clearance.
    pub fn safe_z(&self, plan: &ToolpathPlan) -> f64 {
        let clearance = if self.settings.z_hop_height > 0.0 {
            self.settings.z_hop_height
        } else {
            FALLBACK_CLEARANCE
        };
        plan.part_top_z
            .map_or(FALLBACK_SAFE_Z, |top| top + clearance)
    }

    /// Values available to every script.
    pub fn script_vars(&self, plan: &ToolpathPlan) -> TemplateVars {
        let s = self.settings;
        let mut vars = TemplateVars::new();
        vars.set("safe_z", format!("{:.4}", self.safe_z(plan)))
            .set("travel_feedrate", format!("{:.0}", s.travel_feedrate))
            .set("print_feedrate", format!("{:.0}", s.print_feedrate))
            .set("rotation_feedrate", format!("{:.0}", s.rotation_feedrate))
            .set("retraction_amount", format!("{:.4}", s.retraction_amount))
            .set("retraction_speed", format!("{:.0}", s.retraction_speed))
            .set("z_hop", format!("{:.4}", s.z_hop_height));
        vars
    }

    /// Emit the whole program.
    pub fn emit(&self, plan: &ToolpathPlan) -> MotionProgram {
        info!(setups = plan.setups.len(), "Emitting motion");

        let vars = self.script_vars(plan);
        let mut state = EmitState::default();

        self.emit_script(&mut state, "header", &self.settings.header, &vars);

        let total = plan.setups.len();
        for (i, setup) in plan.setups.iter().enumerate() {
            self.emit_setup(&mut state, setup, i + 1, total, &vars);
        }

        self.emit_script(&mut state, "footer", &self.settings.footer, &vars);

        let mut program = state.program;
        program.stats.setups = total;
        program.stats.layers = plan.layer_count();
        program.stats.final_extruder_position = state.extruder_position;

        info!(
            lines = program.lines.len(),
            filament_mm = program.stats.filament_mm,
            warnings = program.warnings.len(),
            "Motion emitted"
        );
        program
    }

    fn emit_setup(
        &self,
        state: &mut EmitState,
        setup: &Setup,
        number: usize,
        total: usize,
        vars: &TemplateVars,
    ) {
        let s = self.settings;
        debug!(setup = number, wcs = setup.wcs_index, "Setup");

        state.push(MotionCommand::Comment(format!(
            "--- Setup {number} of {total} ---"
        )));

        self.emit_script(state, "before_orientation", &s.before_orientation, vars);

        let angles = setup.angles;
        state.push_commented(
            MotionCommand::Rotate {
                a_axis: s.a_axis_letter.clone(),
                a_deg: angles.a_deg,
                c_axis: s.c_axis_letter.clone(),
                c_deg: angles.c_deg,
                feed: s.rotation_feedrate,
            },
            format!(
                "Rotate to {}={:.3}, {}={:.3}",
                s.a_axis_letter, angles.a_deg, s.c_axis_letter, angles.c_deg
            ),
        );

        let index = setup.wcs_index;
        state.push_commented(
            MotionCommand::SetWcs {
                index,
                origin: setup.world_origin,
            },
            format!("Set WCS P{index} origin"),
        );

        match WorkOffset::from_index(index) {
            Some(offset @ WorkOffset::Standard(g)) => state.push_commented(
                MotionCommand::ActivateWcs(offset),
                format!("Activate WCS G{g} (P{index})"),
            ),
            Some(offset @ WorkOffset::Extended(p)) => state.push_commented(
                MotionCommand::ActivateWcs(offset),
                format!("Activate extended WCS P{p} (P{index})"),
            ),
            None => {
                state.push(MotionCommand::Comment(format!(
                    "WARNING: WCS P-number {index} is not valid"
                )));
                state.warn(EmitWarning::InvalidWcsIndex {
                    setup: number,
                    index,
                });
            }
        }

        self.emit_script(state, "after_orientation", &s.after_orientation, vars);

        state.last_position = None;
        for layer in &setup.layers {
            self.emit_layer(state, setup, number, layer);
        }
    }

    fn emit_layer(&self, state: &mut EmitState, setup: &Setup, setup_number: usize, layer: &Layer) {
        let s = self.settings;
        let layer_number = layer.index + 1;
        state.push(MotionCommand::Comment(format!(
            "Layer {layer_number} at Z_slice_frame={:.4}",
            layer.z
        )));

        for (i, path) in layer.paths.iter().enumerate() {
            let points: Vec<Point3> = path
                .points
                .iter()
                .map(|p| {
                    setup
                        .slice_to_world
                        .apply_point(&Point3::new(p.x, p.y, layer.z))
                })
                .collect();

            let Some((&start, rest)) = points.split_first().filter(|(_, rest)| !rest.is_empty())
            else {
                state.warn(EmitWarning::DegeneratePath {
                    setup: setup_number,
                    layer: layer_number,
                    path: i + 1,
                });
                continue;
            };

            let hop_from = state.last_position.filter(|_| s.z_hop_height > 0.0);
            if let Some(last) = hop_from {
                state.push_commented(
                    MotionCommand::ZHop {
                        z: last.z + s.z_hop_height,
                        feed: s.travel_feedrate,
                    },
                    "Z hop up",
                );
            }

            state.push_commented(
                MotionCommand::Travel {
                    to: start,
                    feed: s.travel_feedrate,
                },
                format!("Travel to start of path {}", i + 1),
            );
            state.program.stats.travel_moves += 1;

            if hop_from.is_some() {
                state.push_commented(
                    MotionCommand::ZHop {
                        z: start.z,
                        feed: s.travel_feedrate,
                    },
                    "Z hop down",
                );
            }

            let mut last = start;
            for &to in rest {
                let e = self
                    .extrusion
                    .filament_length((to - last).norm(), layer.layer_height);
                state.extruder_position += e;
                state.program.stats.filament_mm += e;
                state.program.stats.extrude_moves += 1;
                state.push(MotionCommand::Extrude {
                    to,
                    e: state.extruder_position,
                    feed: s.print_feedrate,
                });
                last = to;
            }
            state.last_position = Some(last);
        }
    }

    /// Render, emit and track one user script.
    fn emit_script(
        &self,
        state: &mut EmitState,
        name: &'static str,
        template: &str,
        vars: &TemplateVars,
    ) {
        let text = match render(template, vars) {
            Ok(text) => text,
            Err(TemplateError::Unresolved { name: placeholder }) => {
                state.warn(EmitWarning::UnresolvedPlaceholder {
                    script: name,
                    name: placeholder,
                });
                template.to_string()
            }
            Err(e @ TemplateError::Malformed { .. }) => {
                state.warn(EmitWarning::MalformedTemplate {
                    script: name,
                    reason: e.to_string(),
                });
                template.to_string()
            }
        };

        let lines = script_lines(&text);
        let mut warnings = Vec::new();
        state.extruder_position = track_extruder(&lines, state.extruder_position, &mut warnings);
        for warning in warnings {
            state.warn(warning);
        }
        for line in lines {
            state.push(MotionCommand::RawScript(line));
        }
    }
}
