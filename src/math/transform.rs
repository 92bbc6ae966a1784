use nalgebra::{Rotation3, Unit};

use super::{Point3, Vector3};

/// Principal axis for rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn unit(self) -> Unit<Vector3> {
        match self {
            Self::X => Vector3::x_axis(),
            Self::Y => Vector3::y_axis(),
            Self::Z => Vector3::z_axis(),
        }
    }
}

/// Rotates `point` about a principal axis passing through `origin`.
///
/// Right-hand rule: for [`Axis::X`] a positive angle maps
/// `y' = y cos θ − z sin θ`, `z' = y sin θ + z cos θ`.
///
/// * `angle` - Rotation angle in radians.
#[must_use]
pub fn rotate_about(point: &Point3, origin: &Point3, axis: Axis, angle: f64) -> Point3 {
    let rotation = Rotation3::from_axis_angle(&axis.unit(), angle);
    origin + rotation * (point - origin)
}

/// Rotates `point` about the X axis through `origin` (heel).
#[must_use]
pub fn rotate_about_x(point: &Point3, origin: &Point3, angle: f64) -> Point3 {
    rotate_about(point, origin, Axis::X, angle)
}

/// Moves `point` by `offset`.
#[must_use]
pub fn translate(point: &Point3, offset: &Vector3) -> Point3 {
    point + offset
}

/// Scales each coordinate of `point` independently about the global origin.
#[must_use]
pub fn scale(point: &Point3, factors: &Vector3) -> Point3 {
    Point3::from(point.coords.component_mul(factors))
}

/// Reflects `point` across the centerplane `y = 0`.
#[must_use]
pub fn mirror_y(point: &Point3) -> Point3 {
    Point3::new(point.x, -point.y, point.z)
}
