pub mod aabb;
pub mod polygon_2d;
pub mod spline;
pub mod transform;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Standard gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.81;

pub use aabb::Aabb;
