//! Drawing surface with a canvas-2D style clip.
//!
//! Every draw call blends source-over into an RGBA buffer. While a clip is
//! active each write is scaled by the clip coverage of its pixel, so nothing
//! lands outside the clip region. [`Canvas::release_clip`] drops the clip for
//! the drawing that follows.

use super::calculations::ClipCircle;
use super::filters::blur_mask;
use super::params::ShadowStyle;
use crate::types::Color;
use image::{GrayImage, Rgba, RgbaImage};

pub struct Canvas {
    pixels: RgbaImage,
    /// Per-pixel coverage, row-major. `None` means the whole canvas.
    clip: Option<Vec<f32>>,
}

impl Canvas {
    /// A canvas filled with `matte`.
    pub fn new(width: u32, height: u32, matte: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, matte.into()),
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_clipped(&self) -> bool {
        self.clip.is_some()
    }

    /// Restrict subsequent drawing to `circle`.
    pub fn clip_to_circle(&mut self, circle: &ClipCircle) {
        let (w, h) = self.pixels.dimensions();
        let mut mask = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                mask.push(circle.coverage(x, y));
            }
        }
        self.clip = Some(mask);
    }

    /// Drop the clip; later drawing may touch any pixel.
    pub fn release_clip(&mut self) {
        self.clip = None;
    }

    fn clip_at(&self, x: u32, y: u32) -> f32 {
        match &self.clip {
            Some(mask) => mask[(y * self.pixels.width() + x) as usize],
            None => 1.0,
        }
    }

    /// Blend `[r, g, b, a]` at `(x, y)` with extra `coverage`.
    fn blend(&mut self, x: u32, y: u32, src: [u8; 4], coverage: f32) {
        let coverage = coverage * self.clip_at(x, y);
        if coverage <= 0.0 || src[3] == 0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        *dst = source_over(*dst, src, coverage);
    }

    /// Draw `image` with its top-left corner at `(x, y)`. Off-canvas parts are skipped.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i64, y: i64) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        for (sx, sy, pixel) in image.enumerate_pixels() {
            let dx = x + sx as i64;
            let dy = y + sy as i64;
            if dx < 0 || dy < 0 || dx >= w || dy >= h {
                continue;
            }
            self.blend(dx as u32, dy as u32, pixel.0, 1.0);
        }
    }

    /// Fill the top `height` pixels with `color` fading linearly to transparent.
    ///
    /// Row alpha is sampled at the pixel center, like a canvas linear gradient.
    pub fn fill_top_gradient(&mut self, height: f64, color: Color) {
        if height <= 0.0 {
            return;
        }
        let rows = (height.ceil() as u32).min(self.height());
        for y in 0..rows {
            let t = ((y as f64 + 0.5) / height).clamp(0.0, 1.0);
            let src = color.with_opacity((1.0 - t) as f32);
            for x in 0..self.width() {
                self.blend(x, y, src.0, 1.0);
            }
        }
    }

    /// Paint `color` through a coverage `mask` placed at `(x, y)`.
    pub fn fill_mask(&mut self, mask: &GrayImage, x: i64, y: i64, color: Color) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        for (mx, my, coverage) in mask.enumerate_pixels() {
            if coverage[0] == 0 {
                continue;
            }
            let dx = x + mx as i64;
            let dy = y + my as i64;
            if dx < 0 || dy < 0 || dx >= w || dy >= h {
                continue;
            }
            self.blend(dx as u32, dy as u32, color.0, coverage[0] as f32 / 255.0);
        }
    }

    /// Paint the blurred, offset shadow of `mask` as it would be drawn at `(x, y)`.
    pub fn fill_mask_shadow(&mut self, mask: &GrayImage, x: i64, y: i64, shadow: &ShadowStyle) {
        if shadow.color.alpha() == 0 {
            return;
        }
        let (blurred, pad) = blur_mask(mask, shadow.sigma());
        let sx = x + shadow.offset_x.round() as i64 - pad as i64;
        let sy = y + shadow.offset_y.round() as i64 - pad as i64;
        self.fill_mask(&blurred, sx, sy, shadow.color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Porter-Duff source-over on straight-alpha pixels.
fn source_over(dst: Rgba<u8>, src: [u8; 4], coverage: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}
