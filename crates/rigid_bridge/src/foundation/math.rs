//! Math utilities and types
//!
//! Geometry crosses the native boundary as single-precision floats, so every
//! alias here is `f32` based.

pub use nalgebra::{Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Canonical forward direction.
///
/// Used as the default direction of built bodies and as the fixed direction
/// reported by ghost objects.
pub const BASE_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Origin of the world
pub const ORIGIN: Vec3 = Vec3::new(0.0, 0.0, 0.0);

/// Returns `true` when every component is finite.
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Normalize `direction` and scale it to `length`.
///
/// Returns `None` for a zero-length or non-finite direction.
pub fn normalize_and_scale(direction: &Vec3, length: f32) -> Option<Vec3> {
    if !is_finite(direction) {
        return None;
    }
    direction.try_normalize(f32::EPSILON).map(|unit| unit * length)
}

/// Mirror the Y axis.
///
/// This layer treats +Y as "up" while the native engine integrates along the
/// inverted axis.
pub fn flip_y(v: &Vec3) -> Vec3 {
    Vec3::new(v.x, -v.y, v.z)
}
