//! Logo text layout: `<primary` + `accent` + `/>` on one line.
//!
//! Layout is computed once from measured advance widths, then drawn run by
//! run. Each run paints its own shadow first and its glyphs second, so a
//! later run's shadow may fall over the edge of an earlier run's glyphs,
//! exactly like consecutive `fillText` calls with a shadow set.

use super::calculations::{logo_font_size, safe_zone_padding};
use super::canvas::Canvas;
use super::params::{LogoStyle, ShadowStyle};
use super::typeface::Typeface;
use crate::types::{Branding, Color, FormatDescriptor};

/// One colored segment of the logo.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub color: Color,
    /// Left edge of the em box, canvas pixels.
    pub x: f64,
    /// Top of the em box, canvas pixels.
    pub y: f64,
    /// Measured advance width.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoLayout {
    pub font_px: f32,
    pub padding_x: f64,
    pub padding_y: f64,
    pub runs: Vec<TextRun>,
    pub shadow: ShadowStyle,
}

impl LogoLayout {
    /// Place the three runs left to right with no gaps, starting at the safe-zone padding.
    pub fn compute(
        format: &FormatDescriptor,
        branding: &Branding,
        style: &LogoStyle,
        face: &impl Typeface,
    ) -> Self {
        let canvas = (format.width, format.height);
        let font_px = logo_font_size(format.width, style);
        let (padding_x, padding_y) = safe_zone_padding(canvas, format.shape, style);

        let segments = [
            (format!("<{}", branding.primary_text), style.text_color),
            (branding.accent_text.clone(), branding.accent_color),
            ("/>".to_string(), style.text_color),
        ];

        let mut runs = Vec::with_capacity(segments.len());
        let mut cursor = padding_x;
        for (text, color) in segments {
            let width = face.measure(&text, font_px) as f64;
            runs.push(TextRun {
                text,
                color,
                x: cursor,
                y: padding_y,
                width,
            });
            cursor += width;
        }

        Self {
            font_px,
            padding_x,
            padding_y,
            runs,
            shadow: style.shadow,
        }
    }

    /// Total advance of all runs.
    pub fn width(&self) -> f64 {
        self.runs.iter().map(|r| r.width).sum()
    }

    pub fn draw(&self, canvas: &mut Canvas, face: &impl Typeface) {
        for run in &self.runs {
            let mask = face.rasterize(&run.text, self.font_px);
            if mask.is_empty() {
                continue;
            }
            let x = run.x.round() as i64 + mask.left as i64;
            let y = run.y.round() as i64 + mask.top as i64;
            canvas.fill_mask_shadow(&mask.image, x, y, &self.shadow);
            canvas.fill_mask(&mask.image, x, y, run.color);
        }
    }
}
