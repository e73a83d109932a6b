//! Plane bisection: the cut edges where a plane crosses a mesh.
//!
//! Cut points are keyed by mesh topology rather than by position: a point is
//! either an existing vertex lying on the plane or the crossing of one mesh
//! edge. Neighbouring triangles therefore share cut points exactly, and the
//! result is a graph that can be walked into contours.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tilt_math::{Point3, Tolerance, Vec3};

use crate::mesh::TriangleMesh;

/// Unordered cut-edge soup produced by [`bisect_plane`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutEdges {
    /// Cut points, all lying on the plane.
    pub points: Vec<Point3>,
    /// Edges as pairs of indices into `points`.
    pub edges: Vec<[usize; 2]>,
}

impl CutEdges {
    /// Number of cut edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when the plane misses the mesh.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CutKey {
    /// Mesh vertex lying on the plane.
    Vertex(u32),
    /// Crossing of the mesh edge `(lo, hi)`.
    Edge(u32, u32),
}

/// Intersect a mesh with the plane through `origin` with normal `normal`.
///
/// Triangles lying entirely in the plane, or only touching it at a vertex,
/// contribute no edge. Edges shared by two triangles are reported once.
/// A zero normal yields an empty result.
pub fn bisect_plane(mesh: &TriangleMesh, origin: &Point3, normal: &Vec3) -> CutEdges {
    let mut cut = CutEdges::default();
    let Some(normal) = normal.try_normalize(f64::EPSILON) else {
        return cut;
    };

    let tol = Tolerance::DEFAULT;
    let distances: Vec<f64> = mesh
        .positions
        .iter()
        .map(|p| normal.dot(&(p - origin)))
        .collect();
    let side = |d: f64| -> i8 {
        if tol.is_zero(d) {
            0
        } else if d > 0.0 {
            1
        } else {
            -1
        }
    };

    let mut lookup: HashMap<CutKey, usize> = HashMap::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for tri in mesh.indices.chunks_exact(3) {
        if tri.iter().any(|&i| i as usize >= mesh.positions.len()) {
            continue;
        }

        let mut hits: Vec<CutKey> = Vec::with_capacity(3);
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            let (sa, sb) = (side(distances[a as usize]), side(distances[b as usize]));
            let key = if sa == 0 {
                Some(CutKey::Vertex(a))
            } else if sa * sb < 0 {
                Some(CutKey::Edge(a.min(b), a.max(b)))
            } else {
                None
            };
            if let Some(key) = key {
                if !hits.contains(&key) {
                    hits.push(key);
                }
            }
        }

        // 3 hits: coplanar triangle. 1 hit: touching at a vertex.
        if hits.len() != 2 {
            continue;
        }

        let i0 = intern(&mut cut, &mut lookup, hits[0], mesh, &distances);
        let i1 = intern(&mut cut, &mut lookup, hits[1], mesh, &distances);
        if i0 == i1 {
            continue;
        }
        if seen.insert((i0.min(i1), i0.max(i1))) {
            cut.edges.push([i0, i1]);
        }
    }

    cut
}

fn intern(
    cut: &mut CutEdges,
    lookup: &mut HashMap<CutKey, usize>,
    key: CutKey,
    mesh: &TriangleMesh,
    distances: &[f64],
) -> usize {
    match lookup.entry(key) {
        Entry::Occupied(e) => *e.get(),
        Entry::Vacant(e) => {
            let point = match key {
                CutKey::Vertex(v) => mesh.positions[v as usize],
                CutKey::Edge(a, b) => {
                    let (pa, pb) = (mesh.positions[a as usize], mesh.positions[b as usize]);
                    let (da, db) = (distances[a as usize], distances[b as usize]);
                    let t = da / (da - db);
                    pa + (pb - pa) * t
                }
            };
            cut.points.push(point);
            *e.insert(cut.points.len() - 1)
        }
    }
}
