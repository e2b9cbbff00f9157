//! Text measuring and rasterization trait.
//!
//! The [`Typeface`] trait is the seam between logo layout and whatever
//! renders glyphs. Layout only needs advance widths; drawing needs coverage
//! masks. The production implementation is
//! [`RustTypeFace`](super::rusttype_face::RustTypeFace).

use image::GrayImage;

/// Coverage of a rasterized text run.
///
/// `left`/`top` place the mask relative to the run origin, which is the
/// top-left of the em box (canvas `textBaseline = "top"`).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub image: GrayImage,
    pub left: i32,
    pub top: i32,
}

impl GlyphMask {
    pub fn empty() -> Self {
        Self {
            image: GrayImage::new(0, 0),
            left: 0,
            top: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}

/// A bold monospace face the logo is set in.
///
/// `Sync` so one compositor can render several formats on rayon workers.
pub trait Typeface: Sync {
    /// Advance width of `text` at `px` pixels per em.
    fn measure(&self, text: &str, px: f32) -> f32;

    /// Coverage mask of `text` at `px` pixels per em.
    fn rasterize(&self, text: &str, px: f32) -> GlyphMask;
}

impl<T: Typeface + ?Sized> Typeface for &T {
    fn measure(&self, text: &str, px: f32) -> f32 {
        (**self).measure(text, px)
    }

    fn rasterize(&self, text: &str, px: f32) -> GlyphMask {
        (**self).rasterize(text, px)
    }
}

impl<T: Typeface + ?Sized> Typeface for Box<T> {
    fn measure(&self, text: &str, px: f32) -> f32 {
        (**self).measure(text, px)
    }

    fn rasterize(&self, text: &str, px: f32) -> GlyphMask {
        (**self).rasterize(text, px)
    }
}
