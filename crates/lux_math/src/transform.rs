// Transform utilities for Mat4
//
// Builders for the translate/rotate/scale matrices applied to meshes.
// glam::DMat4 already provides transform_point3() and transform_vector3().

use crate::{Mat4, Vec3};

/// Translation matrix.
pub fn translate(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

/// Rotation matrix from Euler angles in radians, applied X then Y then Z.
pub fn rotate(angles: Vec3) -> Mat4 {
    Mat4::from_rotation_z(angles.z)
        * Mat4::from_rotation_y(angles.y)
        * Mat4::from_rotation_x(angles.x)
}

/// Non-uniform scale matrix.
pub fn scale(factors: Vec3) -> Mat4 {
    Mat4::from_scale(factors)
}
