//! Image renderer.
//!
//! Renders every pixel with multi-sampling:
//! - Jittered camera rays for anti-aliasing
//! - Recursive shading per sample (see [`Tracer`])
//! - Rows rendered in parallel with rayon, each with its own RNG and counters

use std::time::Instant;

use lux_core::{Color, Scene};
use lux_math::Interval;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use crate::sampling::gen_f64;
use crate::shading::Tracer;
use crate::stats::RenderStats;

/// Errors that can occur while rendering or writing images.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} framebuffer")]
    FramebufferTooLarge { width: u32, height: u32 },

    #[error("framebuffer is {actual:?} but the render is configured for {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("framebuffer holds {actual} pixels, expected {expected}")]
    PixelCount { expected: usize, actual: usize },

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples: u32,
    /// Deepest recursion level that still traces; deeper rays see the background
    pub max_depth: u32,
    /// Indirect rays per global-illumination hit
    pub gi_samples: u32,
    /// Weight of the averaged indirect light against the direct light
    pub indirect_weight: f64,
    /// Fixed seed for reproducible renders; random when `None`
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            samples: 50,
            max_depth: 2,
            gi_samples: 16,
            indirect_weight: 0.5,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(RenderError::InvalidConfig(
                "samples per pixel must be at least 1".into(),
            ));
        }
        if !(self.indirect_weight.is_finite() && self.indirect_weight >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "indirect weight must be finite and non-negative, got {}",
                self.indirect_weight
            )));
        }
        Ok(())
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct Render {
    pub framebuffer: Framebuffer,
    pub stats: RenderStats,
}

/// Render the scene into a newly allocated framebuffer.
///
/// The framebuffer is allocated before any tracing starts.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> RenderResult<Render> {
    config.validate()?;
    let mut framebuffer = Framebuffer::new(config.width, config.height)?;
    let stats = render_into(&mut framebuffer, scene, camera, config)?;

    Ok(Render { framebuffer, stats })
}

/// Render the scene into an existing framebuffer of matching size.
pub fn render_into(
    framebuffer: &mut Framebuffer,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> RenderResult<RenderStats> {
    config.validate()?;

    let expected = (config.width, config.height);
    let actual = (framebuffer.width, framebuffer.height);
    if expected != actual {
        return Err(RenderError::SizeMismatch { expected, actual });
    }
    let pixel_count = config.width as usize * config.height as usize;
    if framebuffer.pixels.len() != pixel_count {
        return Err(RenderError::PixelCount {
            expected: pixel_count,
            actual: framebuffer.pixels.len(),
        });
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "Rendering {}x{} at {} spp: {} objects, {} lights, {} threads",
        config.width,
        config.height,
        config.samples,
        scene.len(),
        scene.lights().len(),
        rayon::current_num_threads()
    );
    log::debug!(
        "max depth {}, {} GI samples, indirect weight {}, seed {}",
        config.max_depth,
        config.gi_samples,
        config.indirect_weight,
        seed
    );

    let start = Instant::now();
    let stats: RenderStats = framebuffer
        .pixels
        .par_chunks_mut(config.width as usize)
        .enumerate()
        .map(|(row, pixels)| {
            let rng = StdRng::seed_from_u64(row_seed(seed, row as u64));
            let mut tracer = Tracer::new(scene, config, rng);

            for (col, pixel) in pixels.iter_mut().enumerate() {
                let color = render_pixel(&mut tracer, camera, col as u32, row as u32, config);
                *pixel = color_to_rgb(color);
            }
            tracer.into_stats()
        })
        .sum();

    log::info!(
        "Rendered in {:.2?}: {} rays, {} intersection tests",
        start.elapsed(),
        stats.rays,
        stats.intersection_tests
    );
    Ok(stats)
}

/// Average `config.samples` jittered samples of pixel (col, row).
///
/// Row 0 is the top of the image.
pub fn render_pixel<R: Rng>(
    tracer: &mut Tracer<'_, R>,
    camera: &Camera,
    col: u32,
    row: u32,
    config: &RenderConfig,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples {
        let u = (col as f64 + gen_f64(tracer.rng())) / config.width as f64;
        let v = 1.0 - (row as f64 + gen_f64(tracer.rng())) / config.height as f64;
        pixel_color += tracer.shade(&camera.generate_ray(u, v), 0);
    }

    // Average the samples
    pixel_color / config.samples as f64
}

/// Convert a color to RGB24: clamp to [0, 1], scale, round half up.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let channel = |c: f64| (Interval::UNIT.clamp(c) * 255.0 + 0.5) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Independent seed per row so results do not depend on thread scheduling.
fn row_seed(seed: u64, row: u64) -> u64 {
    seed ^ row.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
