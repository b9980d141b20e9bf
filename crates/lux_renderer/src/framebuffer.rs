//! RGB24 output buffer.

use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::renderer::{RenderError, RenderResult};

/// A row-major, top-to-bottom RGB24 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Framebuffer {
    /// Allocate a black framebuffer.
    ///
    /// Fails instead of aborting when the pixel count overflows or the
    /// allocation cannot be satisfied.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let too_large = || RenderError::FramebufferTooLarge { width, height };

        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| len.checked_mul(3).is_some())
            .ok_or_else(too_large)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        pixels.resize(len, [0; 3]);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get the pixel at (x, y), where y = 0 is the top row.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y). Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = rgb;
        }
    }

    /// The raw RGB24 bytes, stride `width * 3`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Encode as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let image = RgbImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .ok_or(RenderError::PixelCount {
                expected: self.width as usize * self.height as usize,
                actual: self.pixels.len(),
            })?;
        image.save_with_format(path.as_ref(), ImageFormat::Png)?;

        log::debug!("Wrote {}x{} PNG to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }

    /// Decode an image file into a framebuffer, converting to RGB24.
    pub fn load_png<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let image = image::open(path)?.to_rgb8();
        let (width, height) = image.dimensions();

        Ok(Self {
            width,
            height,
            pixels: bytemuck::cast_slice(image.as_raw()).to_vec(),
        })
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let fb = Framebuffer::new(4, 3).unwrap();

        assert_eq!(fb.len(), 12);
        assert_eq!(fb.as_bytes().len(), 36);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_too_large() {
        let result = Framebuffer::new(u32::MAX, u32::MAX);
        assert!(matches!(result, Err(RenderError::FramebufferTooLarge { .. })));
    }

    #[test]
    fn test_get_set_row_major() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.set(2, 1, [1, 2, 3]);

        assert_eq!(fb.get(2, 1), Some([1, 2, 3]));
        assert_eq!(fb.pixels[5], [1, 2, 3]);
        assert_eq!(&fb.as_bytes()[15..18], &[1, 2, 3]);
        assert_eq!(fb.get(3, 0), None);

        // Ignored
        fb.set(0, 2, [9, 9, 9]);
        assert!(!fb.pixels.contains(&[9, 9, 9]));
    }

    #[test]
    fn test_png_round_trip() {
        let mut fb = Framebuffer::new(7, 5).unwrap();
        for (i, pixel) in fb.pixels.iter_mut().enumerate() {
            let i = i as u8;
            *pixel = [i.wrapping_mul(37), i.wrapping_mul(11).wrapping_add(3), 255 - i];
        }

        let path = std::env::temp_dir().join(format!("lux_round_trip_{}.png", std::process::id()));
        fb.save_png(&path).unwrap();
        let loaded = Framebuffer::load_png(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, fb);
    }

    #[test]
    fn test_load_missing() {
        let result = Framebuffer::load_png("/definitely/not/here.png");
        assert!(matches!(result, Err(RenderError::Image(_))));
    }
}
