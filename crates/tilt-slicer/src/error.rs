//! Error types for the slicer.

use thiserror::Error;

/// Errors that can occur during orientation solving and slicing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlicerError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Invalid slice settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Plane normal too short to define an orientation.
    #[error("plane normal is degenerate (length {length:.4})")]
    DegenerateNormal {
        /// Length of the rejected normal.
        length: f64,
    },

    /// The world-to-slice transform could not be inverted.
    #[error("slicing transform is not invertible")]
    SingularTransform,

    /// A reference face does not lie in a single plane.
    #[error("face is not planar (deviation {deviation:.6})")]
    NonPlanarFace {
        /// Largest distance of a vertex from the face plane.
        deviation: f64,
    },

    /// A reference face has too few distinct vertices to define a plane.
    #[error("face is degenerate: {0}")]
    DegenerateFace(String),

    /// No orientation produced any layer.
    #[error("no toolpaths generated from {planes} plane(s)")]
    NoToolpaths {
        /// Number of planes that were tried.
        planes: usize,
    },
}

/// Result type for slicer operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
