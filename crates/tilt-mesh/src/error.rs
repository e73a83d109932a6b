//! Error types for mesh loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A triangle references a vertex that does not exist.
    #[error("triangle index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange {
        /// The offending vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Index buffer length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndices(usize),

    /// Failed to open or read a mesh file.
    #[error("failed to read {path}: {source}")]
    IoRead {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file was readable but not a valid mesh.
    #[error("failed to parse {path}: {details}")]
    Parse {
        /// The path that failed.
        path: PathBuf,
        /// Parser message.
        details: String,
    },
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
