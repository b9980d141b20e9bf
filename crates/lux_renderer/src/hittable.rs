//! Hit records and the scene traversal.
//!
//! Traversal is a linear scan over the object list. Scenes here hold tens
//! of objects, so there is no acceleration structure; cost per ray is
//! O(objects + triangles).

use lux_core::{Geometry, Object};
use lux_math::{Interval, Ray, Vec3};

use crate::sphere::intersect_sphere;
use crate::stats::RenderStats;
use crate::triangle::intersect_triangle;

/// Smallest admissible ray parameter. Roots at or below this are treated
/// as the ray's own origin surface.
pub const T_MIN: f64 = 1e-6;

/// Distance secondary rays are pushed off the surface along the normal.
pub const SURFACE_OFFSET: f64 = 1e-4;

/// Result of a single primitive test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f64,
    /// Surface parameters (sphere UV or triangle barycentrics)
    pub u: f64,
    pub v: f64,
    /// Outward geometric normal (unit length)
    pub normal: Vec3,
}

/// Record of the nearest ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Surface parameters
    pub u: f64,
    pub v: f64,
    /// Point of intersection
    pub point: Vec3,
    /// Outward surface normal. May face away from the ray; see [`Hit::front_face`].
    pub normal: Vec3,
    /// The object struck
    pub object: &'a Object,
}

impl<'a> Hit<'a> {
    /// Whether the ray arrived from the side the normal points to.
    #[inline]
    pub fn front_face(&self, ray: &Ray) -> bool {
        ray.direction.dot(self.normal) < 0.0
    }

    /// The normal flipped, if needed, to point against the ray.
    #[inline]
    pub fn facing_normal(&self, ray: &Ray) -> Vec3 {
        if self.front_face(ray) {
            self.normal
        } else {
            -self.normal
        }
    }
}

/// Find the nearest intersection of `ray` with any object within `ray_t`.
///
/// Counts one ray per call and one intersection test per primitive.
pub fn intersect<'a>(
    ray: &Ray,
    objects: &'a [Object],
    ray_t: Interval,
    stats: &mut RenderStats,
) -> Option<Hit<'a>> {
    stats.rays += 1;

    let mut closest: Option<Hit<'a>> = None;
    for object in objects {
        let interval = ray_t.with_max(closest.map_or(ray_t.max, |hit| hit.t));
        if let Some(found) = hit_object(ray, object, interval, stats) {
            closest = Some(Hit {
                t: found.t,
                u: found.u,
                v: found.v,
                point: ray.at(found.t),
                normal: found.normal,
                object,
            });
        }
    }

    closest
}

/// Test one object, returning its nearest intersection within `ray_t`.
fn hit_object(
    ray: &Ray,
    object: &Object,
    ray_t: Interval,
    stats: &mut RenderStats,
) -> Option<Intersection> {
    match &object.geometry {
        Geometry::Sphere(sphere) => {
            stats.intersection_tests += 1;
            intersect_sphere(ray, sphere, ray_t)
        }
        Geometry::Mesh(mesh) => {
            let mut closest: Option<Intersection> = None;
            for tri in mesh.triangles() {
                stats.intersection_tests += 1;
                let interval = ray_t.with_max(closest.map_or(ray_t.max, |i| i.t));
                let [a, b, c] = [tri[0].pos, tri[1].pos, tri[2].pos];
                if let Some(found) = intersect_triangle(ray, a, b, c, interval) {
                    closest = Some(found);
                }
            }
            closest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lux_core::{presets, Material, Mesh};

    fn forward() -> Interval {
        Interval::new(T_MIN, f64::INFINITY)
    }

    #[test]
    fn test_nearest_of_many() {
        let objects = vec![
            Object::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::default()),
            Object::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::default()),
            Object::sphere(Vec3::new(0.0, 0.0, -20.0), 1.0, Material::default()),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut stats = RenderStats::default();

        let hit = intersect(&ray, &objects, forward(), &mut stats).unwrap();

        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-12);
        assert!(std::ptr::eq(hit.object, &objects[1]));
        assert_eq!(hit.point, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(stats.rays, 1);
        assert_eq!(stats.intersection_tests, 3);
    }

    #[test]
    fn test_empty_scene_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut stats = RenderStats::default();

        assert!(intersect(&ray, &[], forward(), &mut stats).is_none());
        assert_eq!(stats.rays, 1);
        assert_eq!(stats.intersection_tests, 0);
    }

    #[test]
    fn test_mesh_counts_every_triangle() {
        let mut cube = presets::cube_mesh();
        cube.transform(&lux_math::translate(Vec3::new(0.0, 0.0, -3.0)));
        let objects = vec![Object::mesh(cube, Material::default())];
        // Off-center so the ray stays clear of the faces' diagonals
        let ray = Ray::new(Vec3::new(0.1, -0.2, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut stats = RenderStats::default();

        let hit = intersect(&ray, &objects, forward(), &mut stats).unwrap();

        // Front face of the cube is at z = -2.5
        assert_relative_eq!(hit.t, 2.5, epsilon = 1e-12);
        assert_relative_eq!(hit.normal.z.abs(), 1.0, epsilon = 1e-12);
        assert_eq!(stats.intersection_tests, 12);
    }

    #[test]
    fn test_interval_limits_hits() {
        let objects = vec![Object::sphere(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            Material::default(),
        )];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut stats = RenderStats::default();

        assert!(intersect(&ray, &objects, Interval::new(T_MIN, 5.0), &mut stats).is_none());
    }

    #[test]
    fn test_facing_normal() {
        let objects = vec![Object::mesh(
            Mesh::from_positions(&[
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ]),
            Material::default(),
        )];
        let mut stats = RenderStats::default();

        // Counter-clockwise seen from +Z: outward normal is +Z
        let from_front = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = intersect(&from_front, &objects, forward(), &mut stats).unwrap();
        assert!(hit.front_face(&from_front));
        assert_eq!(hit.facing_normal(&from_front), Vec3::Z);

        let from_back = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let hit = intersect(&from_back, &objects, forward(), &mut stats).unwrap();
        assert!(!hit.front_face(&from_back));
        assert_eq!(hit.facing_normal(&from_back), -Vec3::Z);
    }
}
