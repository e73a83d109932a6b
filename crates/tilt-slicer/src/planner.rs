//! Toolpath planning across reference planes.
//!
//! Each reference plane becomes one [`Setup`]: the machine orientation for
//! that plane plus the layers sliced in its frame. Planes that cannot be
//! oriented or that slice to nothing are skipped with a warning and do not
//! consume a work coordinate system index.

use tilt_math::{Point3, Transform};
use tilt_mesh::MeshSource;
use tracing::{debug, info, warn};

use crate::error::{Result, SlicerError};
use crate::orientation::{solve_orientation, Plane, RotaryAngles};
use crate::slice::{slice_layers, Layer};
use crate::warning::PlanWarning;
use crate::SliceSettings;

/// One orientation cycle: rotate, set the work origin, print its layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    /// Work coordinate system index assigned to this setup.
    pub wcs_index: u32,
    /// Index of the source plane in the input list.
    pub plane_index: usize,
    /// Rotary axis positions.
    pub angles: RotaryAngles,
    /// Work origin in world space.
    pub world_origin: Point3,
    /// World to slicing frame.
    pub world_to_slice: Transform,
    /// Slicing frame to world.
    pub slice_to_world: Transform,
    /// Layers in increasing Z.
    pub layers: Vec<Layer>,
}

impl Setup {
    /// Total number of paths across all layers.
    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|l| l.paths.len()).sum()
    }
}

/// Ordered setups ready for motion emission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolpathPlan {
    /// Setups in print order.
    pub setups: Vec<Setup>,
    /// Planes or contours that were skipped or degraded.
    pub warnings: Vec<PlanWarning>,
    /// Highest world Z of the part, if known.
    pub part_top_z: Option<f64>,
}

impl ToolpathPlan {
    /// Total number of layers across all setups.
    pub fn layer_count(&self) -> usize {
        self.setups.iter().map(|s| s.layers.len()).sum()
    }
}

/// Plan toolpaths for every reference plane in order.
pub fn plan_toolpaths(
    source: &impl MeshSource,
    planes: &[Plane],
    settings: &SliceSettings,
) -> Result<ToolpathPlan> {
    settings.validate()?;

    let mesh = source.mesh();
    if mesh.is_empty() {
        return Err(SlicerError::EmptyMesh);
    }

    let world = source.world_transform();
    let part_top_z = source.world_mesh().z_range().map(|(_, max)| max);

    info!(
        planes = planes.len(),
        triangles = mesh.num_triangles(),
        layer_height = settings.layer_height,
        "Planning toolpaths"
    );

    let mut plan = ToolpathPlan {
        part_top_z,
        ..Default::default()
    };
    let mut next_wcs = settings.start_wcs_index;

    for (plane_index, plane) in planes.iter().enumerate() {
        let orientation = match solve_orientation(plane) {
            Ok(o) => o,
            Err(e) => {
                warn!(plane = plane_index, error = %e, "Skipping plane");
                plan.warnings.push(PlanWarning::OrientationFailed {
                    plane: plane_index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let to_slice = orientation.world_to_slice.then(world);
        let layers = slice_layers(mesh, &to_slice, settings.layer_height);
        if layers.is_empty() {
            warn!(plane = plane_index, "No layers generated; skipping plane");
            plan.warnings.push(PlanWarning::NoLayers { plane: plane_index });
            continue;
        }

        for layer in layers.iter().filter(|l| l.has_truncated_paths()) {
            warn!(plane = plane_index, z = layer.z, "Contour hit traversal limit");
            plan.warnings.push(PlanWarning::ContourTruncated {
                plane: plane_index,
                z: layer.z,
            });
        }

        debug!(
            plane = plane_index,
            wcs = next_wcs,
            layers = layers.len(),
            "Setup planned"
        );

        plan.setups.push(Setup {
            wcs_index: next_wcs,
            plane_index,
            angles: orientation.angles,
            world_origin: orientation.origin,
            world_to_slice: orientation.world_to_slice,
            slice_to_world: orientation.slice_to_world,
            layers,
        });
        next_wcs = next_wcs.saturating_add(1);
    }

    if plan.setups.is_empty() {
        return Err(SlicerError::NoToolpaths {
            planes: planes.len(),
        });
    }

    info!(
        setups = plan.setups.len(),
        layers = plan.layer_count(),
        warnings = plan.warnings.len(),
        "Planning complete"
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tilt_math::Vec3;
    use tilt_mesh::{MeshObject, TriangleMesh};

    fn block() -> MeshObject {
        MeshObject::new(
            "block",
            TriangleMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 2.0)),
        )
    }

    fn settings() -> SliceSettings {
        SliceSettings {
            layer_height: 0.5,
            start_wcs_index: 3,
        }
    }

    #[test]
    fn test_single_upward_plane() {
        let planes = [Plane::new(Point3::new(5.0, 5.0, 0.0), Vec3::z())];
        let plan = plan_toolpaths(&block(), &planes, &settings()).unwrap();

        assert_eq!(plan.setups.len(), 1);
        let setup = &plan.setups[0];
        assert_eq!(setup.wcs_index, 3);
        assert_eq!(setup.angles, RotaryAngles::default());
        assert_eq!(setup.layers.len(), 4);
        assert!(plan.warnings.is_empty());
        assert_eq!(plan.part_top_z, Some(2.0));
    }

    #[test]
    fn test_degenerate_plane_is_skipped() {
        let planes = [
            Plane::new(Point3::new(5.0, 5.0, 0.0), Vec3::z()),
            Plane::new(Point3::origin(), Vec3::new(0.0, 0.01, 0.0)),
        ];
        let plan = plan_toolpaths(&block(), &planes, &settings()).unwrap();

        assert_eq!(plan.setups.len(), 1);
        assert_eq!(plan.setups[0].wcs_index, 3);
        assert_eq!(plan.warnings.len(), 1);
        assert!(matches!(
            plan.warnings[0],
            PlanWarning::OrientationFailed { plane: 1, .. }
        ));
    }

    #[test]
    fn test_wcs_indices_skip_empty_planes() {
        let planes = [
            Plane::new(Point3::origin(), Vec3::new(0.0, 0.0, 1e-3)),
            Plane::new(Point3::new(5.0, 5.0, 2.0), -Vec3::z()),
            Plane::new(Point3::new(10.0, 5.0, 1.0), Vec3::x()),
        ];
        let plan = plan_toolpaths(&block(), &planes, &settings()).unwrap();

        let indices: Vec<u32> = plan.setups.iter().map(|s| s.wcs_index).collect();
        assert_eq!(indices, vec![3, 4]);
        assert_eq!(plan.setups[0].plane_index, 1);
        assert_relative_eq!(plan.setups[0].angles.a_deg, 180.0);

        // Slicing along X: the block is 10 wide
        assert_eq!(plan.setups[1].layers.len(), 20);
    }

    #[test]
    fn test_world_transform_is_honoured() {
        let object = block().with_world(Transform::translation(0.0, 0.0, 100.0));
        let planes = [Plane::new(Point3::new(0.0, 0.0, 100.0), Vec3::z())];
        let plan = plan_toolpaths(&object, &planes, &settings()).unwrap();

        assert_eq!(plan.part_top_z, Some(102.0));
        assert_relative_eq!(plan.setups[0].layers[0].z, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_no_toolpaths() {
        let planes = [Plane::new(Point3::origin(), Vec3::zeros())];
        assert_eq!(
            plan_toolpaths(&block(), &planes, &settings()),
            Err(SlicerError::NoToolpaths { planes: 1 })
        );
        assert_eq!(
            plan_toolpaths(&block(), &[], &settings()),
            Err(SlicerError::NoToolpaths { planes: 0 })
        );
    }

    #[test]
    fn test_empty_mesh() {
        let object = MeshObject::new("empty", TriangleMesh::new());
        let planes = [Plane::new(Point3::origin(), Vec3::z())];
        assert_eq!(
            plan_toolpaths(&object, &planes, &settings()),
            Err(SlicerError::EmptyMesh)
        );
    }

    #[test]
    fn test_invalid_settings() {
        let planes = [Plane::new(Point3::origin(), Vec3::z())];
        let settings = SliceSettings {
            layer_height: 0.0,
            ..SliceSettings::default()
        };
        assert!(matches!(
            plan_toolpaths(&block(), &planes, &settings),
            Err(SlicerError::InvalidSettings(_))
        ));
    }
}
