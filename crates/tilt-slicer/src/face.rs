//! Reference planes from mesh faces.

use tilt_math::{Point3, Transform, Vec3};
use tilt_mesh::MeshSource;
use tracing::warn;

use crate::error::{Result, SlicerError};
use crate::orientation::{Plane, MIN_NORMAL_LENGTH};
use crate::warning::PlanWarning;

/// Largest vertex distance from the face plane still counted as planar.
pub const PLANARITY_TOLERANCE: f64 = 1e-5;

/// Turn a polygonal face given in local coordinates into a world-space plane.
///
/// The normal is the Newell normal of the polygon, carried to world space by
/// the inverse transpose of `world`. The center is the vertex mean.
pub fn plane_from_face(points: &[Point3], world: &Transform) -> Result<Plane> {
    if points.len() < 3 {
        return Err(SlicerError::DegenerateFace(format!(
            "{} vertices",
            points.len()
        )));
    }

    let mut newell = Vec3::zeros();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        newell.x += (p.y - q.y) * (p.z + q.z);
        newell.y += (p.z - q.z) * (p.x + q.x);
        newell.z += (p.x - q.x) * (p.y + q.y);
    }
    let Some(normal) = newell.try_normalize(f64::EPSILON) else {
        return Err(SlicerError::DegenerateFace("zero area".into()));
    };

    let sum = points.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords);
    let center = Point3::from(sum / points.len() as f64);

    let deviation = points
        .iter()
        .map(|p| (p - center).dot(&normal).abs())
        .fold(0.0, f64::max);
    if deviation > PLANARITY_TOLERANCE {
        return Err(SlicerError::NonPlanarFace { deviation });
    }

    let world_normal = world.apply_normal(&normal);
    let length = world_normal.norm();
    if !(length >= MIN_NORMAL_LENGTH) {
        return Err(SlicerError::DegenerateNormal { length });
    }

    Ok(Plane::new(world.apply_point(&center), world_normal / length))
}

/// Reference planes from triangles of `source`, by triangle index.
///
/// Faces that cannot be used are skipped with a warning.
pub fn planes_from_triangles(
    source: &impl MeshSource,
    faces: &[usize],
) -> (Vec<Plane>, Vec<PlanWarning>) {
    let mut planes = Vec::with_capacity(faces.len());
    let mut warnings = Vec::new();

    for &face in faces {
        let result = match source.mesh().triangle(face) {
            Some(tri) => plane_from_face(&tri, source.world_transform()),
            None => Err(SlicerError::DegenerateFace(format!(
                "index out of range (mesh has {} triangles)",
                source.mesh().num_triangles()
            ))),
        };
        match result {
            Ok(plane) => planes.push(plane),
            Err(e) => {
                warn!(face, error = %e, "Skipping reference face");
                warnings.push(PlanWarning::FaceSkipped {
                    face,
                    reason: e.to_string(),
                });
            }
        }
    }

    (planes, warnings)
}
