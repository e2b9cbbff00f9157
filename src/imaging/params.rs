//! Style parameters for the compositing steps.
//!
//! These structs describe *how strong* each effect is, not where it goes.
//! Geometry comes from [`calculations`](super::calculations); pixel work from
//! [`canvas`](super::canvas) and [`filters`](super::filters). Defaults
//! reproduce the reference look, and every value can be overridden from the
//! `[style]` table of the config file.
//!
//! ## Types
//!
//! - [`BackdropStyle`]: blur radius and brightness of the cover-filled backdrop.
//! - [`GradientStyle`]: the dark band fading down from the top edge.
//! - [`ShadowStyle`]: drop shadow behind every logo run.
//! - [`LogoStyle`]: font size rule, safe-zone padding, text color.
//! - [`CompositeStyle`]: all of the above plus the matte color.

use crate::types::Color;
use serde::{Deserialize, Serialize};

/// Blurred, darkened copy of the source filling the letterbox area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackdropStyle {
    /// Gaussian standard deviation in output pixels (CSS `blur(20px)`).
    pub blur_sigma: f32,
    /// Multiplier applied to RGB after blurring (CSS `brightness(0.4)`).
    pub brightness: f32,
}

impl Default for BackdropStyle {
    fn default() -> Self {
        Self {
            blur_sigma: 20.0,
            brightness: 0.4,
        }
    }
}

/// Vertical black-to-transparent band at the top of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradientStyle {
    /// Alpha of the black at the top edge.
    pub top_opacity: f32,
    /// Band height as a fraction of canvas height, rectangular formats.
    pub rectangle_fraction: f64,
    /// Band height for circular formats. The logo sits closer to the center there.
    pub circle_fraction: f64,
}

impl Default for GradientStyle {
    fn default() -> Self {
        Self {
            top_opacity: 0.5,
            rectangle_fraction: 0.2,
            circle_fraction: 0.4,
        }
    }
}

/// Drop shadow drawn under each text run.
///
/// `blur` follows the canvas `shadowBlur` convention: the Gaussian sigma is
/// half of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowStyle {
    pub color: Color,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl ShadowStyle {
    pub fn sigma(&self) -> f32 {
        (self.blur / 2.0).max(0.0)
    }
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK.with_opacity(0.9),
            blur: 15.0,
            offset_x: 3.0,
            offset_y: 3.0,
        }
    }
}

/// Font sizing and placement of the logo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoStyle {
    /// Font size as a fraction of canvas width, before clamping.
    pub font_scale: f32,
    pub min_font_px: f32,
    pub max_font_px: f32,
    /// Safe-zone inset as a fraction of the canvas, rectangular formats.
    pub rectangle_padding: f64,
    /// Safe-zone inset for circular formats, where corners are clipped away.
    pub circle_padding: f64,
    /// Color of the `<primary` and `/>` runs.
    pub text_color: Color,
    pub shadow: ShadowStyle,
}

impl Default for LogoStyle {
    fn default() -> Self {
        Self {
            font_scale: 0.05,
            min_font_px: 24.0,
            max_font_px: 60.0,
            rectangle_padding: 0.05,
            circle_padding: 0.15,
            text_color: Color::WHITE,
            shadow: ShadowStyle::default(),
        }
    }
}

/// Everything the compositor needs besides the inputs of a render call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositeStyle {
    /// Initial canvas fill. Only visible outside the circle of circular formats.
    pub matte: Color,
    pub backdrop: BackdropStyle,
    pub gradient: GradientStyle,
    pub logo: LogoStyle,
}

impl Default for CompositeStyle {
    fn default() -> Self {
        Self {
            matte: Color::BLACK,
            backdrop: BackdropStyle::default(),
            gradient: GradientStyle::default(),
            logo: LogoStyle::default(),
        }
    }
}
