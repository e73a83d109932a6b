//! tilt CLI - 3+2 axis planar-orientation slicer
//!
//! Slices an STL part once per reference plane and writes multi-axis G-code.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tilt_gcode::{export_motion, MotionStats};
use tilt_mesh::{load_stl, MeshObject, MeshSource};
use tilt_slicer::{plan_toolpaths, plane_from_face, planes_from_triangles, rotary_angles, Plane};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{parse_plane, JobConfig, PlaneEntry};

#[derive(Parser)]
#[command(name = "tilt")]
#[command(author, version, about = "3+2 axis planar-orientation slicer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh and write G-code
    Slice {
        /// Input STL file
        input: PathBuf,
        /// TOML job file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Triangle index to use as a reference face (repeatable)
        #[arg(long = "face")]
        faces: Vec<usize>,
        /// Reference plane as cx,cy,cz,nx,ny,nz (repeatable)
        #[arg(long = "plane", value_parser = parse_plane, allow_hyphen_values = true)]
        planes: Vec<PlaneEntry>,
        /// Output G-code file (default: input with .gcode extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default job configuration as TOML
    Config,
    /// Display information about an STL file
    Info {
        /// Input STL file
        input: PathBuf,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Slice {
            input,
            config,
            faces,
            planes,
            output,
            json,
        } => {
            let mut job = match config {
                Some(path) => JobConfig::load(&path)?,
                None => JobConfig::default(),
            };
            job.faces.extend(faces);
            job.planes.extend(planes);
            job.validate()?;

            let output = output.unwrap_or_else(|| input.with_extension("gcode"));
            let object = load_object(&input)?;
            let report = slice_job(&object, &job, &output)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let stats = &report.stats;
                println!("Wrote {}", output.display());
                println!("  Setups: {}", stats.setups);
                println!("  Layers: {}", stats.layers);
                println!("  Paths: {}", report.paths);
                println!("  Moves: {} travel, {} extrude", stats.travel_moves, stats.extrude_moves);
                println!("  Filament: {:.1}mm", stats.filament_mm);
                if !report.warnings.is_empty() {
                    println!("  Warnings:");
                    for warning in &report.warnings {
                        println!("    {warning}");
                    }
                }
            }
        }
        Commands::Config => {
            print!("{}", JobConfig::default().to_toml()?);
        }
        Commands::Info { input } => {
            show_info(&input)?;
        }
    }

    Ok(())
}

fn load_object(path: &Path) -> Result<MeshObject> {
    let mesh = load_stl(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("part");
    Ok(MeshObject::new(name, mesh))
}

/// Outcome of a slicing job.
#[derive(Debug, Serialize)]
struct SliceReport {
    #[serde(flatten)]
    stats: MotionStats,
    /// Paths across all setups.
    paths: usize,
    /// Face, planning and emission warnings in the order they arose.
    warnings: Vec<String>,
}

/// Collect reference planes, plan, and export.
fn slice_job(object: &MeshObject, job: &JobConfig, output: &Path) -> Result<SliceReport> {
    let mut planes: Vec<Plane> = job.planes.iter().map(|p| p.to_plane()).collect();
    let (face_planes, face_warnings) = planes_from_triangles(object, &job.faces);
    planes.extend(face_planes);

    if planes.is_empty() {
        bail!("No reference planes: pass --face or --plane, or list them in the config");
    }
    info!(object = %object.name, planes = planes.len(), "Slicing");

    let plan = plan_toolpaths(object, &planes, &job.slice)?;
    let program = export_motion(&plan, &job.gcode, output)?;

    let warnings = face_warnings
        .iter()
        .chain(&plan.warnings)
        .map(ToString::to_string)
        .chain(program.warnings.iter().map(ToString::to_string))
        .collect();
    Ok(SliceReport {
        stats: program.stats,
        paths: plan.setups.iter().map(|s| s.path_count()).sum(),
        warnings,
    })
}

fn show_info(path: &Path) -> Result<()> {
    let object = load_object(path)?;
    let mesh = object.mesh();

    println!("STL file: {}", path.display());
    println!("  Triangles: {}", mesh.num_triangles());
    println!("  Vertices: {}", mesh.num_vertices());
    if let Some((min, max)) = mesh.bounds() {
        println!(
            "  Bounds: [{:.3}, {:.3}, {:.3}] - [{:.3}, {:.3}, {:.3}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    // One candidate per distinct orientation
    let mut seen: Vec<(f64, f64)> = Vec::new();
    println!("\nCandidate orientations:");
    for face in 0..mesh.num_triangles() {
        let Some(tri) = mesh.triangle(face) else {
            continue;
        };
        let Ok(angles) = plane_from_face(&tri, object.world_transform())
            .and_then(|plane| rotary_angles(&plane.normal))
        else {
            continue;
        };
        if seen
            .iter()
            .any(|&(a, c)| (a - angles.a_deg).abs() < 0.01 && (c - angles.c_deg).abs() < 0.01)
        {
            continue;
        }
        seen.push((angles.a_deg, angles.c_deg));
        println!(
            "  face {:>6}: A={:8.3} C={:8.3}",
            face, angles.a_deg, angles.c_deg
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilt_math::Point3;
    use tilt_mesh::TriangleMesh;

    fn block() -> MeshObject {
        MeshObject::new(
            "block",
            TriangleMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 2.0)),
        )
    }

    #[test]
    fn test_slice_job_from_planes_and_faces() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("block.gcode");
        let mut job = JobConfig::from_toml("[slice]\nlayer_height = 0.5\n").unwrap();
        job.planes.push(parse_plane("5,5,0,0,0,1").unwrap());
        job.faces.push(0);

        let report = slice_job(&block(), &job, &output).unwrap();
        assert_eq!(report.stats.setups, 2);
        assert_eq!(report.paths, report.stats.travel_moves);
        assert!(report.warnings.is_empty());

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("G54 ; Activate WCS G54 (P1)"));
        assert!(text.contains("G55 ; Activate WCS G55 (P2)"));
    }

    #[test]
    fn test_slice_job_reports_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("block.gcode");
        let mut job = JobConfig::from_toml("[slice]\nlayer_height = 0.5\n").unwrap();
        job.planes.push(parse_plane("5,5,0,0,0,1").unwrap());
        job.faces.push(999);
        job.gcode.header = "M117 {missing}".into();

        let report = slice_job(&block(), &job, &output).unwrap();
        assert_eq!(report.stats.setups, 1);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("999"));
        assert!(report.warnings[1].contains("missing"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["setups"], 1);
        assert_eq!(json["warnings"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_slice_job_without_planes() {
        let dir = tempfile::tempdir().unwrap();
        let err = slice_job(&block(), &JobConfig::default(), &dir.path().join("x.gcode"))
            .unwrap_err();
        assert!(err.to_string().contains("No reference planes"));
    }
}
