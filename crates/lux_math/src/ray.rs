use crate::Vec3;

/// A ray in 3D space.
///
/// Points along the ray are `origin + t * direction`; only `t >= 0` is
/// considered ahead of the origin. The direction does not have to be
/// normalized, but it must not be zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose origin is pushed `epsilon` along `normal`.
    ///
    /// Secondary rays spawned at a surface use this so they do not
    /// immediately hit the surface they left.
    #[inline]
    pub fn offset(point: Vec3, normal: Vec3, direction: Vec3, epsilon: f64) -> Self {
        Self::new(point + normal * epsilon, direction)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
