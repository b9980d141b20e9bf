//! Math primitives for lux.
//!
//! Everything is double precision: the renderer works with scenes whose
//! walls are spheres with radii in the tens of thousands, where single
//! precision loses the surface entirely.

// Re-export glam's f64 types under the names the rest of the workspace uses
pub use glam::{DMat4 as Mat4, DVec2 as Vec2, DVec3 as Vec3};

mod interval;
mod ray;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::{rotate, scale, translate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_is_double_precision() {
        // 1e8 + 1 is not representable in f32
        let a = Vec3::new(1.0e8, 0.0, 0.0);
        let b = a + Vec3::X;
        assert_eq!(b.x - a.x, 1.0);
    }
}
