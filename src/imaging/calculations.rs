//! Pure geometry for the compositing steps.
//!
//! All functions here are pure and testable without any pixels or fonts.
//! Placements are kept in `f64` canvas coordinates; [`Placement::snap`]
//! converts to whole pixels only at the point of drawing.

use super::params::{GradientStyle, LogoStyle};
use crate::types::Shape;

/// A scaled image positioned on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Uniform scale applied to the source.
    pub scale: f64,
}

/// A [`Placement`] rounded to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Round to pixels. Size never collapses below 1px.
    pub fn snap(&self) -> PixelRect {
        PixelRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: (self.width.round() as u32).max(1),
            height: (self.height.round() as u32).max(1),
        }
    }
}

fn centered(source: (u32, u32), canvas: (u32, u32), scale: f64) -> Placement {
    let (src_w, src_h) = source;
    let (cw, ch) = canvas;
    let width = src_w as f64 * scale;
    let height = src_h as f64 * scale;
    Placement {
        x: (cw as f64 - width) / 2.0,
        y: (ch as f64 - height) / 2.0,
        width,
        height,
        scale,
    }
}

/// Scale the source until it covers the whole canvas, centered.
///
/// One axis matches the canvas exactly; the other overflows equally on both sides.
pub fn cover_fit(source: (u32, u32), canvas: (u32, u32)) -> Placement {
    let scale = f64::max(
        canvas.0 as f64 / source.0 as f64,
        canvas.1 as f64 / source.1 as f64,
    );
    centered(source, canvas, scale)
}

/// Scale the source until it fits entirely inside the canvas, centered.
///
/// One axis matches the canvas exactly; the other leaves equal margins.
///
/// ```
/// # use brand_frame::imaging::contain_fit;
/// // 1920x1080 into a 1080 square: 0.5625 scale, letterboxed top and bottom
/// let p = contain_fit((1920, 1080), (1080, 1080));
/// assert_eq!(p.height, 607.5);
/// assert_eq!(p.y, 236.25);
/// ```
pub fn contain_fit(source: (u32, u32), canvas: (u32, u32)) -> Placement {
    let scale = f64::min(
        canvas.0 as f64 / source.0 as f64,
        canvas.1 as f64 / source.1 as f64,
    );
    centered(source, canvas, scale)
}

/// Circle that circular formats are clipped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipCircle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl ClipCircle {
    /// Largest circle centered in the canvas.
    pub fn inscribed(canvas: (u32, u32)) -> Self {
        let (w, h) = (canvas.0 as f64, canvas.1 as f64);
        Self {
            cx: w / 2.0,
            cy: h / 2.0,
            radius: w.min(h) / 2.0,
        }
    }

    /// Coverage of the pixel whose top-left corner is `(x, y)`.
    ///
    /// 1.0 inside, 0.0 once the pixel center is half a pixel past the edge,
    /// linear in between.
    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        let dx = x as f64 + 0.5 - self.cx;
        let dy = y as f64 + 0.5 - self.cy;
        let distance = (dx * dx + dy * dy).sqrt();
        (self.radius - distance + 0.5).clamp(0.0, 1.0) as f32
    }
}

/// Height of the top gradient band.
pub fn gradient_height(canvas_height: u32, shape: Shape, style: &GradientStyle) -> f64 {
    let fraction = match shape {
        Shape::Rectangle => style.rectangle_fraction,
        Shape::Circle => style.circle_fraction,
    };
    canvas_height as f64 * fraction
}

/// Logo font size: a fraction of canvas width, clamped to a legible range.
pub fn logo_font_size(canvas_width: u32, style: &LogoStyle) -> f32 {
    (canvas_width as f32 * style.font_scale)
        .min(style.max_font_px)
        .max(style.min_font_px)
}

/// Safe-zone inset `(x, y)` where the logo starts.
pub fn safe_zone_padding(canvas: (u32, u32), shape: Shape, style: &LogoStyle) -> (f64, f64) {
    let fraction = match shape {
        Shape::Rectangle => style.rectangle_padding,
        Shape::Circle => style.circle_padding,
    };
    (canvas.0 as f64 * fraction, canvas.1 as f64 * fraction)
}
