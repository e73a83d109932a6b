//! Indexed triangle meshes and the object wrapper handed to the slicer.

use tilt_math::{Point3, Transform};

use crate::error::{MeshError, Result};

/// Indexed triangle mesh in its own local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from positions and a flat index buffer.
    pub fn from_parts(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Closed axis-aligned box with outward-facing triangles.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let positions = vec![
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            2, 3, 7, 2, 7, 6, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Self { positions, indices }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// True when there is nothing to slice.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.len() < 3
    }

    /// Vertex positions of triangle `i`, if it exists and its indices are valid.
    pub fn triangle(&self, i: usize) -> Option<[Point3; 3]> {
        let tri = self.indices.get(i * 3..i * 3 + 3)?;
        Some([
            *self.positions.get(tri[0] as usize)?,
            *self.positions.get(tri[1] as usize)?,
            *self.positions.get(tri[2] as usize)?,
        ])
    }

    /// Check index buffer consistency.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::RaggedIndices(self.indices.len()));
        }
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: self.positions.len(),
            });
        }
        Ok(())
    }

    /// Independent copy with every vertex mapped through `transform`.
    ///
    /// The source mesh is left untouched; slicing always works on such a copy.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| transform.apply_point(p))
                .collect(),
            indices: self.indices.clone(),
        }
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.positions.first()?;
        let bounds = self.positions.iter().fold((first, first), |(min, max), p| {
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(bounds)
    }

    /// Minimum and maximum Z of the vertices.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.bounds().map(|(min, max)| (min.z, max.z))
    }
}

/// Read-only access to a mesh and its placement in the world.
///
/// Implemented by whatever owns the geometry. The slicer never mutates a
/// source; it asks for copies instead.
pub trait MeshSource {
    /// Mesh in local coordinates.
    fn mesh(&self) -> &TriangleMesh;

    /// Local-to-world transform.
    fn world_transform(&self) -> &Transform;

    /// Isolated copy of the mesh in world coordinates.
    fn world_mesh(&self) -> TriangleMesh {
        self.mesh().transformed(self.world_transform())
    }
}

/// A named mesh placed in the world.
#[derive(Debug, Clone)]
pub struct MeshObject {
    /// Object name, used in logs and output comments.
    pub name: String,
    /// Geometry in local coordinates.
    pub mesh: TriangleMesh,
    /// Local-to-world placement.
    pub world: Transform,
}

impl MeshObject {
    /// Place `mesh` in the world with the identity transform.
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            world: Transform::identity(),
        }
    }

    /// Replace the world transform.
    pub fn with_world(mut self, world: Transform) -> Self {
        self.world = world;
        self
    }
}

impl MeshSource for MeshObject {
    fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    fn world_transform(&self) -> &Transform {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = TriangleMesh::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 5.0, 2.0));
        let (min, max) = mesh.bounds().unwrap();
        assert_abs_diff_eq!(min, Point3::origin());
        assert_abs_diff_eq!(max, Point3::new(10.0, 5.0, 2.0));
        assert_eq!(mesh.num_triangles(), 12);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TriangleMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
        assert!(mesh.z_range().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let mesh = TriangleMesh::from_parts(vec![Point3::origin(); 3], vec![0, 1, 3]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange { index: 3, .. })
        ));

        let mesh = TriangleMesh::from_parts(vec![Point3::origin(); 3], vec![0, 1]);
        assert!(matches!(mesh.validate(), Err(MeshError::RaggedIndices(2))));
    }

    #[test]
    fn test_transformed_leaves_source_untouched() {
        let mesh = TriangleMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let before = mesh.clone();
        let moved = mesh.transformed(&Transform::translation(0.0, 0.0, 5.0));
        assert_eq!(mesh, before);
        assert_abs_diff_eq!(moved.z_range().unwrap().0, 5.0);
        assert_abs_diff_eq!(moved.z_range().unwrap().1, 6.0);
    }

    #[test]
    fn test_world_mesh_uses_placement() {
        let object = MeshObject::new(
            "block",
            TriangleMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0)),
        )
        .with_world(Transform::translation(10.0, 0.0, 0.0));
        let (min, _) = object.world_mesh().bounds().unwrap();
        assert_abs_diff_eq!(min.x, 10.0);
        assert_abs_diff_eq!(object.mesh().bounds().unwrap().0.x, 0.0);
    }

    #[test]
    fn test_triangle_lookup() {
        let mesh = TriangleMesh::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let tri = mesh.triangle(2).unwrap();
        assert_abs_diff_eq!(tri[0].z, 1.0);
        assert!(mesh.triangle(12).is_none());
    }
}
