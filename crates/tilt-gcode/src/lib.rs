#![warn(missing_docs)]

//! Multi-axis G-code emission for the tilt slicer.
//!
//! This crate turns a [`ToolpathPlan`] into machine motion: rotary moves and
//! work offset changes between setups, then travel and extruding moves for
//! every contour, with the absolute extruder position computed from the
//! deposited bead volume.
//!
//! # Example
//!
//! ```ignore
//! use tilt_gcode::{export_motion, GcodeSettings};
//!
//! let plan = plan_toolpaths(&object, &planes, &SliceSettings::default())?;
//! let program = export_motion(&plan, &GcodeSettings::default(), "part.gcode")?;
//! println!("Filament: {:.1}mm", program.stats.filament_mm);
//! for warning in &program.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

pub mod command;
pub mod emitter;
pub mod error;
pub mod extrusion;
pub mod script;
pub mod settings;
pub mod template;
pub mod warning;

pub use command::{GcodeLine, MotionCommand, WorkOffset};
pub use emitter::{MotionEmitter, MotionProgram, MotionStats};
pub use error::{GcodeError, Result};
pub use extrusion::ExtrusionModel;
pub use settings::GcodeSettings;
pub use template::{render, TemplateError, TemplateVars};
pub use warning::EmitWarning;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tilt_slicer::ToolpathPlan;
use tracing::info;

/// Write every line of `program`, newline terminated.
pub fn write_program<W: Write>(program: &MotionProgram, mut writer: W) -> std::io::Result<()> {
    for line in &program.lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// Emit `plan` and write it to `path`.
///
/// Emission problems are absorbed into the returned program's warnings; only
/// I/O fails.
pub fn export_motion<P: AsRef<Path>>(
    plan: &ToolpathPlan,
    settings: &GcodeSettings,
    path: P,
) -> Result<MotionProgram> {
    let path = path.as_ref();
    let program = MotionEmitter::new(settings).emit(plan);

    let io_err = |source| GcodeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_program(&program, BufWriter::new(file)).map_err(io_err)?;

    info!(
        path = %path.display(),
        lines = program.lines.len(),
        warnings = program.warnings.len(),
        "Wrote G-code"
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilt_math::{Point3, Vec3};
    use tilt_mesh::{MeshObject, TriangleMesh};
    use tilt_slicer::{plan_toolpaths, Plane, SliceSettings};

    fn block_plan() -> ToolpathPlan {
        let object = MeshObject::new(
            "block",
            TriangleMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 1.0)),
        );
        let planes = [Plane::new(Point3::new(5.0, 5.0, 0.0), Vec3::z())];
        plan_toolpaths(&object, &planes, &SliceSettings::default()).unwrap()
    }

    #[test]
    fn test_export_writes_file() {
        let plan = block_plan();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block.gcode");

        let program = export_motion(&plan, &GcodeSettings::default(), &path).unwrap();
        assert!(program.warnings.is_empty());
        let stats = &program.stats;
        assert_eq!(stats.setups, 1);
        assert_eq!(stats.layers, 5);
        assert!(stats.filament_mm > 0.0);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("M84 ; Disable motors\n"));
        assert!(text.contains("; --- Setup 1 of 1 ---\n"));
        assert!(text.contains("G54 ; Activate WCS G54 (P1)\n"));
        assert_eq!(text.matches("; Layer ").count(), 5);
        assert_eq!(text, program.to_gcode());
    }

    #[test]
    fn test_export_returns_warnings() {
        let mut plan = block_plan();
        plan.setups[0].wcs_index = 0;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("block.gcode");

        let program = export_motion(&plan, &GcodeSettings::default(), &path).unwrap();
        assert_eq!(
            program.warnings,
            vec![EmitWarning::InvalidWcsIndex { setup: 1, index: 0 }]
        );
        assert_eq!(program.stats.setups, 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("; WARNING: WCS P-number 0 is not valid\n"));
    }

    #[test]
    fn test_export_to_missing_directory() {
        let plan = block_plan();
        let err = export_motion(
            &plan,
            &GcodeSettings::default(),
            "/definitely/not/here/out.gcode",
        )
        .unwrap_err();
        assert!(matches!(err, GcodeError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here/out.gcode"));
    }

    #[test]
    fn test_write_program_matches_text() {
        let program = MotionEmitter::new(&GcodeSettings::default()).emit(&block_plan());
        let mut buf = Vec::new();
        write_program(&program, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), program.to_gcode());
    }
}
