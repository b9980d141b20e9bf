//! Pinhole camera.

use lux_math::{Ray, Vec3};

/// Default vertical field of view in degrees.
///
/// From 50 units away this frames the 40-unit-tall demo room.
pub const DEFAULT_VFOV: f64 = 45.0;

/// A pinhole camera with a fixed viewport.
///
/// The viewport's corner and span vectors are computed once; afterwards
/// [`generate_ray`](Camera::generate_ray) is a pure function of (u, v).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Camera at `position` looking at `look_at` with the default field of view.
    pub fn new(position: Vec3, look_at: Vec3, aspect_ratio: f64) -> Self {
        Self::with_fov(position, look_at, aspect_ratio, DEFAULT_VFOV)
    }

    /// Camera with an explicit vertical field of view in degrees.
    pub fn with_fov(position: Vec3, look_at: Vec3, aspect_ratio: f64, vfov: f64) -> Self {
        let viewport_height = 2.0 * (vfov.to_radians() / 2.0).tan();
        let viewport_width = viewport_height * aspect_ratio;

        // Camera basis vectors; w points backwards out of the lens
        let w = (position - look_at).normalize_or_zero();
        let w = if w == Vec3::ZERO { Vec3::Z } else { w };
        let up = if w.cross(Vec3::Y).length_squared() < 1e-12 {
            // Looking straight up or down
            Vec3::Z
        } else {
            Vec3::Y
        };
        let u = up.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left = position - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            position,
            lower_left,
            horizontal,
            vertical,
        }
    }

    /// Ray through viewport coordinates (u, v) in [0, 1]; (0, 0) is the
    /// lower-left corner. Jitter for anti-aliasing is applied by the caller.
    #[inline]
    pub fn generate_ray(&self, u: f64, v: f64) -> Ray {
        let direction = self.lower_left + u * self.horizontal + v * self.vertical - self.position;
        Ray::new(self.position, direction)
    }
}
