//! Mesh file loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tilt_math::Point3;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::TriangleMesh;

/// Load a binary or ASCII STL file.
///
/// Vertices are welded by `stl_io`; degenerate triangles are dropped.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    debug!(
        vertices = stl.vertices.len(),
        triangles = stl.faces.len(),
        "Read STL"
    );

    let positions: Vec<Point3> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v.0[0] as f64, v.0[1] as f64, v.0[2] as f64))
        .collect();

    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    for face in &stl.faces {
        let [a, b, c] = face.vertices;
        if a != b && b != c && a != c {
            indices.extend([a as u32, b as u32, c as u32]);
        }
    }

    let mesh = TriangleMesh::from_parts(positions, indices);
    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    mesh.validate()?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_cube_stl(path: &Path) {
        let mesh = TriangleMesh::cuboid(Point3::origin(), Point3::new(2.0, 2.0, 2.0));
        let triangles: Vec<stl_io::Triangle> = (0..mesh.num_triangles())
            .filter_map(|i| mesh.triangle(i))
            .map(|[v0, v1, v2]| stl_io::Triangle {
                normal: stl_io::Normal::new([0.0, 0.0, 0.0]),
                vertices: [
                    stl_io::Vertex::new([v0.x as f32, v0.y as f32, v0.z as f32]),
                    stl_io::Vertex::new([v1.x as f32, v1.y as f32, v1.z as f32]),
                    stl_io::Vertex::new([v2.x as f32, v2.y as f32, v2.z as f32]),
                ],
            })
            .collect();
        let mut file = File::create(path).unwrap();
        stl_io::write_stl(&mut file, triangles.iter()).unwrap();
    }

    #[test]
    fn test_load_binary_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.stl");
        write_cube_stl(&path);

        let mesh = load_stl(&path).unwrap();
        assert_eq!(mesh.num_triangles(), 12);
        assert_eq!(mesh.num_vertices(), 8);
        let (_, max) = mesh.bounds().unwrap();
        assert!((max.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_stl("/definitely/not/here.stl").unwrap_err();
        assert!(matches!(err, MeshError::IoRead { .. }));
    }

    #[test]
    fn test_load_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"solid nonsense\nthis is not an stl\n").unwrap();
        assert!(load_stl(file.path()).is_err());
    }
}
