//! Recursive shading.
//!
//! [`Tracer::shade`] finds the nearest hit and evaluates its material in a
//! fixed order:
//!
//! 1. depth past `max_depth`, or a miss: background
//! 2. emissive material: its emission, unlit
//! 3. `NORMAL`: the surface normal mapped to [0, 1]
//! 4. `REFRACTION`: the transmitted ray (mirror on total internal reflection)
//! 5. `REFLECTION`: the mirrored ray blended over the local term by
//!    `reflectivity`
//! 6. local term: the base color, checkered if `CHECKERED`, lit by
//!    `GLOBAL_ILLUM` sampling or else by Phong
//!
//! Returned colors are unclamped.

use std::f64::consts::PI;

use lux_core::{Color, Material, MaterialFlags, Scene};
use lux_math::{Interval, Ray, Vec3};
use rand::Rng;

use crate::hittable::{intersect, Hit, SURFACE_OFFSET, T_MIN};
use crate::renderer::RenderConfig;
use crate::sampling::{cosine_hemisphere, sample_light};
use crate::stats::RenderStats;

/// Edge length of one checkerboard cell, in world units.
const CHECKER_SIZE: f64 = 1.0;
/// Brightness of the dark checkerboard cells relative to the base color.
const CHECKER_DARK: f64 = 0.3;

/// Shadow rays stop just short of the sampled light point.
const SHADOW_T_MAX: f64 = 1.0 - 1e-6;

/// Per-task shading state: the read-only scene plus a private random
/// source and counters.
pub struct Tracer<'a, R> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    rng: R,
    stats: RenderStats,
}

impl<'a, R: Rng> Tracer<'a, R> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, rng: R) -> Self {
        Self {
            scene,
            config,
            rng,
            stats: RenderStats::default(),
        }
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn into_stats(self) -> RenderStats {
        self.stats
    }

    pub(crate) fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Radiance arriving along `ray`. Camera rays start at depth 0.
    pub fn shade(&mut self, ray: &Ray, depth: u32) -> Color {
        let scene = self.scene;
        if depth > self.config.max_depth {
            return scene.background;
        }

        let ray_t = Interval::new(T_MIN, f64::INFINITY);
        let Some(hit) = intersect(ray, scene.objects(), ray_t, &mut self.stats) else {
            return scene.background;
        };

        let material = &hit.object.material;
        if material.is_emissive() {
            return material.emission;
        }

        if material.has(MaterialFlags::NORMAL) {
            return (hit.normal + Vec3::ONE) * 0.5;
        }

        if material.has(MaterialFlags::REFRACTION) {
            return self.refraction(ray, &hit, material, depth);
        }

        if material.has(MaterialFlags::REFLECTION) {
            let reflected = material.color * self.reflection(ray, &hit, depth);
            let r = material.reflectivity;
            if r >= 1.0 {
                return reflected;
            }
            let local = self.local(ray, &hit, material, depth);
            return local * (1.0 - r) + reflected * r;
        }

        self.local(ray, &hit, material, depth)
    }

    fn reflection(&mut self, ray: &Ray, hit: &Hit<'_>, depth: u32) -> Color {
        let normal = hit.facing_normal(ray);
        let direction = reflect(ray.direction.normalize(), normal);
        let bounced = Ray::offset(hit.point, normal, direction, SURFACE_OFFSET);

        self.shade(&bounced, depth + 1)
    }

    fn refraction(&mut self, ray: &Ray, hit: &Hit<'_>, material: &Material, depth: u32) -> Color {
        let normal = hit.facing_normal(ray);
        let eta = if hit.front_face(ray) {
            1.0 / material.ior
        } else {
            material.ior
        };

        let unit_direction = ray.direction.normalize();
        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        if eta * sin_theta > 1.0 {
            // Total internal reflection
            return material.color * self.reflection(ray, hit, depth);
        }

        let direction = refract(unit_direction, normal, eta);
        let transmitted = Ray::offset(hit.point, -normal, direction, SURFACE_OFFSET);

        material.color * self.shade(&transmitted, depth + 1)
    }

    fn local(&mut self, ray: &Ray, hit: &Hit<'_>, material: &Material, depth: u32) -> Color {
        let base = if material.has(MaterialFlags::CHECKERED) {
            checker(material.color, hit.point)
        } else {
            material.color
        };

        let normal = hit.facing_normal(ray);
        if material.has(MaterialFlags::GLOBAL_ILLUM) {
            self.global_illumination(hit.point, normal, base, depth)
        } else {
            self.phong(ray, hit.point, normal, material, base)
        }
    }

    /// Lambertian surface lit by sampled direct light plus a cosine-weighted
    /// Monte Carlo estimate of the indirect light.
    fn global_illumination(&mut self, point: Vec3, normal: Vec3, base: Color, depth: u32) -> Color {
        let direct = self.direct_light(point, normal);

        let samples = self.config.gi_samples;
        let mut indirect = Color::ZERO;
        if depth < self.config.max_depth && samples > 0 {
            for _ in 0..samples {
                let direction = cosine_hemisphere(normal, &mut self.rng);
                let bounce = Ray::offset(point, normal, direction, SURFACE_OFFSET);
                indirect += self.shade(&bounce, depth + 1);
            }
            indirect /= samples as f64;
        }

        base * (direct + indirect * self.config.indirect_weight)
    }

    /// Irradiance over π from one area sample per light.
    fn direct_light(&mut self, point: Vec3, normal: Vec3) -> Color {
        let scene = self.scene;
        let origin = point + normal * SURFACE_OFFSET;

        let mut total = Color::ZERO;
        for light in scene.lights().iter().map(|&i| &scene.objects()[i]) {
            let Some(sample) = sample_light(&light.geometry, point, &mut self.rng) else {
                continue;
            };

            let to_light = sample.point - origin;
            let dist_sq = to_light.length_squared();
            if dist_sq < 1e-12 {
                continue;
            }
            let direction = to_light / dist_sq.sqrt();

            let cos_surface = normal.dot(direction);
            let cos_light = sample.normal.dot(direction).abs();
            if cos_surface <= 0.0 || cos_light <= 0.0 {
                continue;
            }
            if self.occluded(origin, to_light) {
                continue;
            }

            let geometry = cos_surface * cos_light * sample.area / (PI * dist_sq);
            total += light.material.emission * geometry;
        }
        total
    }

    /// Ambient plus per-light diffuse and specular terms, each light
    /// shadow-tested at one sampled point.
    fn phong(
        &mut self,
        ray: &Ray,
        point: Vec3,
        normal: Vec3,
        material: &Material,
        base: Color,
    ) -> Color {
        let scene = self.scene;
        let origin = point + normal * SURFACE_OFFSET;
        let view = -ray.direction.normalize();

        let mut color = base * material.ka;
        for light in scene.lights().iter().map(|&i| &scene.objects()[i]) {
            let Some(sample) = sample_light(&light.geometry, point, &mut self.rng) else {
                continue;
            };

            let to_light = sample.point - origin;
            let direction = to_light.normalize_or_zero();
            let diffuse = normal.dot(direction);
            if diffuse <= 0.0 || self.occluded(origin, to_light) {
                continue;
            }

            let specular = reflect(-direction, normal)
                .dot(view)
                .max(0.0)
                .powf(material.shininess);
            let emission = light.material.emission;

            color +=
                base * emission * (material.kd * diffuse) + emission * (material.ks * specular);
        }
        color
    }

    /// True if anything blocks the segment from `origin` to `origin + to_light`.
    fn occluded(&mut self, origin: Vec3, to_light: Vec3) -> bool {
        let shadow = Ray::new(origin, to_light);
        let ray_t = Interval::new(T_MIN, SHADOW_T_MAX);
        intersect(&shadow, self.scene.objects(), ray_t, &mut self.stats).is_some()
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose normal faces it.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Two-tone pattern from the parity of the floored world coordinates.
fn checker(base: Color, point: Vec3) -> Color {
    let cell = (point / CHECKER_SIZE).floor();
    if (cell.x + cell.y + cell.z).rem_euclid(2.0) < 0.5 {
        base
    } else {
        base * CHECKER_DARK
    }
}
