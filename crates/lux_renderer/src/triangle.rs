//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm.

use lux_math::{Interval, Ray, Vec3};

use crate::hittable::Intersection;

/// Denominator magnitude below which the ray counts as parallel to the plane.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Intersect a ray with the triangle (v0, v1, v2).
///
/// Returns t plus the barycentric coordinates (u, v) of the hit, where the
/// point is `v0 + u*(v1 - v0) + v*(v2 - v0)`. The normal is the geometric
/// normal `(v1 - v0) × (v2 - v0)`, normalized; cyclic reorderings of the
/// vertices give the same normal.
pub fn intersect_triangle(
    ray: &Ray,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    ray_t: Interval,
) -> Option<Intersection> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !Interval::UNIT.contains(u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray_t.surrounds(t) {
        return None;
    }

    Some(Intersection {
        t,
        u,
        v,
        normal: edge1.cross(edge2).normalize(),
    })
}
