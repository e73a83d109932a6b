//! Reference plane to machine orientation.
//!
//! A reference plane is brought "up" by a rotation taking its normal onto +Z,
//! followed by a translation putting the plane's center at the origin. The
//! same normal also determines the rotary axis angles the machine needs to
//! present that plane to the tool.

use tilt_math::{Point3, Transform, Vec3};
use tracing::debug;

use crate::error::{Result, SlicerError};

/// Shortest usable plane normal.
pub const MIN_NORMAL_LENGTH: f64 = 0.1;

/// Tolerance on the horizontal components of a vertical normal.
const VERTICAL_TOLERANCE: f64 = 1e-6;

/// A planar reference surface in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane, used as the new work origin.
    pub center: Point3,
    /// Outward normal. Need not be unit length.
    pub normal: Vec3,
}

impl Plane {
    /// Create a plane from a center point and a normal.
    pub fn new(center: Point3, normal: Vec3) -> Self {
        Self { center, normal }
    }
}

/// Rotary axis positions in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotaryAngles {
    /// Tilt, in `[0, 180]`.
    pub a_deg: f64,
    /// Rotation about Z, in `(-180, 180]`.
    pub c_deg: f64,
}

/// Everything needed to print in one reference plane's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Rotary axis positions.
    pub angles: RotaryAngles,
    /// Work origin in world space.
    pub origin: Point3,
    /// Maps world coordinates into the slicing frame.
    pub world_to_slice: Transform,
    /// Maps slicing-frame coordinates back to world.
    pub slice_to_world: Transform,
}

/// Rotary angles for a normal.
///
/// `C = atan2(nx, ny)` and `A = acos(nz)`. A vertical normal gives `C = 0`
/// with `A` either 0 or 180.
pub fn rotary_angles(normal: &Vec3) -> Result<RotaryAngles> {
    let length = normal.norm();
    if !(length >= MIN_NORMAL_LENGTH) {
        return Err(SlicerError::DegenerateNormal { length });
    }
    let n = normal / length;

    if n.x.abs() <= VERTICAL_TOLERANCE && n.y.abs() <= VERTICAL_TOLERANCE {
        let a_deg = if n.z > 0.0 { 0.0 } else { 180.0 };
        return Ok(RotaryAngles { a_deg, c_deg: 0.0 });
    }

    Ok(RotaryAngles {
        a_deg: n.z.clamp(-1.0, 1.0).acos().to_degrees(),
        c_deg: n.x.atan2(n.y).to_degrees(),
    })
}

/// Solve the orientation for a reference plane.
///
/// Fails with [`SlicerError::DegenerateNormal`] when the normal is shorter
/// than [`MIN_NORMAL_LENGTH`] (or not finite).
pub fn solve_orientation(plane: &Plane) -> Result<Orientation> {
    let angles = rotary_angles(&plane.normal)?;

    let rotation = Transform::rotation_between(&plane.normal, &Vec3::z()).ok_or(
        SlicerError::DegenerateNormal {
            length: plane.normal.norm(),
        },
    )?;
    let rotated_center = rotation.apply_point(&plane.center);
    let world_to_slice = Transform::translation(
        -rotated_center.x,
        -rotated_center.y,
        -rotated_center.z,
    )
    .then(&rotation);
    let slice_to_world = world_to_slice
        .inverse()
        .ok_or(SlicerError::SingularTransform)?;

    debug!(
        a = angles.a_deg,
        c = angles.c_deg,
        origin = ?plane.center,
        "Solved orientation"
    );

    Ok(Orientation {
        angles,
        origin: plane.center,
        world_to_slice,
        slice_to_world,
    })
}
