//! Ray-sphere intersection.

use lux_core::Sphere;
use lux_math::{Interval, Ray, Vec3};
use std::f64::consts::PI;

use crate::hittable::Intersection;

/// Intersect a ray with a sphere.
///
/// Solves |origin + t*direction - center|² = radius² and returns the
/// smallest root strictly inside `ray_t`. A negative discriminant is a miss.
/// `ray_t.min` should be a small positive epsilon so that rays leaving the
/// surface do not re-hit it at t ≈ 0.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere, ray_t: Interval) -> Option<Intersection> {
    let oc = sphere.center - ray.origin;
    let a = ray.direction.length_squared();
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - sphere.radius * sphere.radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let point = ray.at(root);
    let normal = (point - sphere.center) / sphere.radius;
    let (u, v) = sphere_uv(normal);

    Some(Intersection { t: root, u, v, normal })
}

/// Get the UV coordinates for a point on the unit sphere.
fn sphere_uv(p: Vec3) -> (f64, f64) {
    // theta: angle down from +Y
    // phi: angle around Y axis from +X
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}
