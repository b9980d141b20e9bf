//! Lux Renderer - CPU ray tracing with Monte Carlo global illumination.
//!
//! Pipeline for every pixel sample:
//! camera ray → nearest hit over the object list → recursive shading
//! (reflection, refraction, shadow and indirect rays re-enter the
//! intersection engine) → averaged, clamped and stored as RGB24.

mod camera;
mod framebuffer;
mod hittable;
mod renderer;
mod sampling;
mod shading;
mod sphere;
mod stats;
mod triangle;

pub use camera::{Camera, DEFAULT_VFOV};
pub use framebuffer::Framebuffer;
pub use hittable::{intersect, Hit, Intersection, SURFACE_OFFSET, T_MIN};
pub use renderer::{
    color_to_rgb, render, render_into, render_pixel, Render, RenderConfig, RenderError,
    RenderResult,
};
pub use shading::Tracer;
pub use sphere::intersect_sphere;
pub use stats::RenderStats;
pub use triangle::intersect_triangle;

/// Re-export the scene and math types the renderer works with
pub use lux_core::{Color, Material, MaterialFlags, Object, Scene};
pub use lux_math::{Interval, Ray, Vec3};
