//! Non-fatal diagnostics collected while planning toolpaths.

use thiserror::Error;

/// A problem that skipped or degraded part of the plan without stopping it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanWarning {
    /// The plane's orientation could not be solved; the plane was skipped.
    #[error("plane {plane}: {reason}; orientation skipped")]
    OrientationFailed {
        /// Index of the plane in the input list.
        plane: usize,
        /// Why the solver rejected it.
        reason: String,
    },

    /// Slicing in this orientation produced no layer; the plane was skipped.
    #[error("plane {plane}: no layers generated; orientation skipped")]
    NoLayers {
        /// Index of the plane in the input list.
        plane: usize,
    },

    /// A contour hit the traversal cap and was kept as-is.
    #[error("plane {plane}: contour at z={z:.4} hit the traversal limit and may be malformed")]
    ContourTruncated {
        /// Index of the plane in the input list.
        plane: usize,
        /// Slice-frame height of the layer.
        z: f64,
    },

    /// A reference face could not be turned into a plane.
    #[error("face {face}: {reason}; ignored")]
    FaceSkipped {
        /// Triangle index of the face.
        face: usize,
        /// Why it was rejected.
        reason: String,
    },
}
