//! Random sampling helpers for Monte Carlo integration.

use std::f64::consts::PI;

use lux_core::{Geometry, Mesh, Sphere};
use lux_math::Vec3;
use rand::Rng;

/// Uniform random f64 in [0, 1).
#[inline]
pub fn gen_f64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniform random direction on the unit sphere.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    // Rejection sampling inside the unit ball, then project to the surface
    loop {
        let v = Vec3::new(
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
            gen_f64(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Cosine-weighted direction in the hemisphere around `normal`.
///
/// Offsetting a uniform sphere point by the normal gives a density of
/// cos(θ)/π over the hemisphere.
pub fn cosine_hemisphere<R: Rng + ?Sized>(normal: Vec3, rng: &mut R) -> Vec3 {
    let direction = normal + random_unit_vector(rng);

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-12 {
        normal
    } else {
        direction.normalize()
    }
}

/// Uniform random point on a triangle.
pub fn uniform_in_triangle<R: Rng + ?Sized>(v0: Vec3, v1: Vec3, v2: Vec3, rng: &mut R) -> Vec3 {
    let mut a = gen_f64(rng);
    let mut b = gen_f64(rng);
    // Fold the upper half of the unit square back onto the triangle
    if a + b > 1.0 {
        a = 1.0 - a;
        b = 1.0 - b;
    }
    v0 + (v1 - v0) * a + (v2 - v0) * b
}

/// A point sampled on the surface of a light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    pub point: Vec3,
    /// Unit surface normal at `point` (sign unspecified for meshes)
    pub normal: Vec3,
    /// Area of the region `point` was drawn from, i.e. the inverse pdf
    pub area: f64,
}

/// Sample a point on an emissive object as seen from `toward`.
///
/// Spheres are sampled uniformly over the hemisphere facing `toward`;
/// the far half cannot be visible from there. Meshes pick a triangle
/// uniformly, then a uniform point inside it.
pub fn sample_light<R: Rng + ?Sized>(
    geometry: &Geometry,
    toward: Vec3,
    rng: &mut R,
) -> Option<LightSample> {
    match geometry {
        Geometry::Sphere(sphere) => Some(sample_sphere(sphere, toward, rng)),
        Geometry::Mesh(mesh) => sample_mesh(mesh, rng),
    }
}

fn sample_sphere<R: Rng + ?Sized>(sphere: &Sphere, toward: Vec3, rng: &mut R) -> LightSample {
    let mut normal = random_unit_vector(rng);
    if normal.dot(toward - sphere.center) < 0.0 {
        normal = -normal;
    }

    LightSample {
        point: sphere.center + normal * sphere.radius,
        normal,
        area: 2.0 * PI * sphere.radius * sphere.radius,
    }
}

fn sample_mesh<R: Rng + ?Sized>(mesh: &Mesh, rng: &mut R) -> Option<LightSample> {
    let count = mesh.triangle_count();
    if count == 0 {
        return None;
    }

    let tri = mesh.triangles().nth(rng.gen_range(0..count))?;
    let (v0, v1, v2) = (tri[0].pos, tri[1].pos, tri[2].pos);
    let cross = (v1 - v0).cross(v2 - v0);
    let tri_area = cross.length() * 0.5;

    Some(LightSample {
        point: uniform_in_triangle(v0, v1, v2, rng),
        normal: cross.normalize_or_zero(),
        area: tri_area * count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_unit_vector_length() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert_relative_eq!(random_unit_vector(&mut rng).length(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cosine_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::new(1.0, 2.0, -0.5).normalize();

        let mut mean_cos = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let dir = cosine_hemisphere(normal, &mut rng);
            let cos = dir.dot(normal);
            assert!(cos >= -1e-9);
            assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-9);
            mean_cos += cos;
        }

        // E[cos θ] under a cos/π density is 2/3
        assert!((mean_cos / n as f64 - 2.0 / 3.0).abs() < 0.02);
    }

    #[test]
    fn test_uniform_in_triangle_inside() {
        let mut rng = StdRng::seed_from_u64(42);
        let (v0, v1, v2) = (Vec3::ZERO, Vec3::X, Vec3::Y);

        for _ in 0..1000 {
            let p = uniform_in_triangle(v0, v1, v2, &mut rng);
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 + 1e-12);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_sphere_light_faces_point() {
        let mut rng = StdRng::seed_from_u64(42);
        let geometry = Geometry::Sphere(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 2.0));
        let toward = Vec3::ZERO;

        for _ in 0..200 {
            let sample = sample_light(&geometry, toward, &mut rng).unwrap();
            let center = Vec3::new(0.0, 10.0, 0.0);
            assert!(sample.normal.dot(toward - center) >= 0.0);
            assert_relative_eq!((sample.point - center).length(), 2.0, epsilon = 1e-9);
            assert_relative_eq!(sample.area, 8.0 * PI, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mesh_light_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let mesh = Mesh::from_positions(&[
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::ZERO,
            Vec3::X * 2.0,
            Vec3::Y * 2.0,
        ]);
        let geometry = Geometry::Mesh(mesh);

        let sample = sample_light(&geometry, Vec3::Z, &mut rng).unwrap();

        // Either triangle, scaled by the triangle count
        assert!(sample.area == 1.0 || sample.area == 4.0);
        assert_relative_eq!(sample.normal.z.abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mesh_light() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(sample_light(&Geometry::Mesh(Mesh::default()), Vec3::ZERO, &mut rng).is_none());
    }
}
