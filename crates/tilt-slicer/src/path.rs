//! Toolpath polylines in the slicing frame.

use tilt_math::Point2;

/// An ordered 2D polyline in the slicing frame.
///
/// Points are printed in order. Closed paths do not repeat their first point
/// at the end, so the last vertex is where printing stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Points along the path.
    pub points: Vec<Point2>,
    /// Whether contour tracing returned to its starting vertex.
    pub closed: bool,
    /// Whether contour tracing stopped at its iteration limit.
    pub truncated: bool,
}

impl Path {
    /// Create a closed path.
    pub fn closed(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: true,
            truncated: false,
        }
    }

    /// Create an open path.
    pub fn open(points: Vec<Point2>) -> Self {
        Self {
            points,
            closed: false,
            truncated: false,
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total 2D length of the printed polyline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Starting point.
    pub fn start(&self) -> Option<&Point2> {
        self.points.first()
    }
}
