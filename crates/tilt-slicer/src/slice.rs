//! Mesh slicing - intersect a reoriented mesh with horizontal planes.

use tilt_math::{Point3, Transform, Vec3};
use tilt_mesh::{bisect_plane, TriangleMesh};
use tracing::{debug, warn};

use crate::contour::build_contours;
use crate::path::Path;

/// A single layer from slicing.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Height of the cut in the slicing frame (mm).
    pub z: f64,
    /// Layer index among the layers that produced paths (0 = first).
    pub index: usize,
    /// Layer thickness used for extrusion (mm).
    pub layer_height: f64,
    /// Contours at this height.
    pub paths: Vec<Path>,
}

impl Layer {
    /// True if any path hit the contour traversal limit.
    pub fn has_truncated_paths(&self) -> bool {
        self.paths.iter().any(|p| p.truncated)
    }
}

/// Generate layer Z heights.
///
/// The first cut sits half a layer above `z_min`; cuts continue while
/// strictly below `z_max`.
pub fn generate_layer_heights(z_min: f64, z_max: f64, layer_height: f64) -> Vec<f64> {
    if !(layer_height > 0.0) || !(z_max > z_min) {
        return Vec::new();
    }

    let base = z_min + layer_height / 2.0;
    (0..)
        .map(|i| base + i as f64 * layer_height)
        .take_while(|&z| z < z_max)
        .collect()
}

/// Contours of `mesh` at height `z`, projected to XY.
pub fn slice_at_z(mesh: &TriangleMesh, z: f64) -> Vec<Path> {
    let cut = bisect_plane(mesh, &Point3::new(0.0, 0.0, z), &Vec3::z());
    build_contours(&cut)
        .into_iter()
        .filter(|p| p.len() >= 2)
        .collect()
}

/// Slice `mesh` after moving it into the slicing frame with `to_slice`.
///
/// The input mesh is never modified. Heights that yield no paths produce no
/// layer. An empty mesh or a non-positive layer height yields no layers.
pub fn slice_layers(mesh: &TriangleMesh, to_slice: &Transform, layer_height: f64) -> Vec<Layer> {
    if mesh.is_empty() {
        warn!("Mesh has no triangles; nothing to slice");
        return Vec::new();
    }
    if !(layer_height > 0.0) {
        warn!(layer_height, "Layer height must be positive; nothing to slice");
        return Vec::new();
    }

    let local = mesh.transformed(to_slice);
    let Some((z_min, z_max)) = local.z_range() else {
        return Vec::new();
    };

    let heights = generate_layer_heights(z_min, z_max, layer_height);
    debug!(z_min, z_max, count = heights.len(), "Slicing");

    let mut layers = Vec::new();
    for z in heights {
        let paths = slice_at_z(&local, z);
        if paths.is_empty() {
            continue;
        }
        debug!(z, index = layers.len(), paths = paths.len(), "Layer");
        layers.push(Layer {
            z,
            index: layers.len(),
            layer_height,
            paths,
        });
    }

    layers
}
