#![warn(missing_docs)]

//! Triangle mesh provider for the tilt slicer.
//!
//! Supplies the mesh-side collaborators the slicer consumes: an indexed
//! triangle mesh with a world transform, isolated transformed copies for
//! slicing, a plane bisection primitive returning cut edges, and STL loading.

pub mod bisect;
pub mod error;
pub mod io;
pub mod mesh;

pub use bisect::{bisect_plane, CutEdges};
pub use error::{MeshError, Result};
pub use io::load_stl;
pub use mesh::{MeshObject, MeshSource, TriangleMesh};
