//! Production [`Typeface`] backed by `rusttype`.
//!
//! ## Font resolution
//!
//! The logo wants a bold monospace face (JetBrains Mono Bold by preference).
//! [`RustTypeFace::from_config`] tries, in order:
//!
//! 1. `font.path` from the config, if set. A missing or broken file here is an
//!    error, never silently skipped.
//! 2. If `font.search_system` is on, the first readable entry of
//!    [`SYSTEM_FONT_CANDIDATES`].
//!
//! TrueType collections (`.ttc`) load their first face.

use super::typeface::{GlyphMask, Typeface};
use crate::config::FontConfig;
use image::GrayImage;
use rusttype::{Font, PositionedGlyph, Scale, point};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error reading font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a usable TrueType/OpenType font: {0}")]
    Invalid(String),
    #[error("No bold monospace font found; set font.path in the config")]
    NotFound,
}

/// Bold monospace fonts commonly present on Linux, macOS and Windows.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/jetbrains-mono/JetBrainsMono-Bold.ttf",
    "/usr/share/fonts/jetbrains-mono/JetBrainsMono-Bold.ttf",
    "/usr/share/fonts/TTF/JetBrainsMono-Bold.ttf",
    "/Library/Fonts/JetBrainsMono-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Bold.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-B.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\consolab.ttf",
    "C:\\Windows\\Fonts\\courbd.ttf",
];

/// `rusttype` font wrapper. Cheap to share: rendering only borrows the font.
pub struct RustTypeFace {
    font: Font<'static>,
    source: Option<PathBuf>,
}

impl RustTypeFace {
    /// Parse a font from raw TTF/OTF/TTC bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FontError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| FontError::Invalid("unrecognized font data".to_string()))?;
        Ok(Self { font, source: None })
    }

    /// Load a font file from disk.
    pub fn open(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut face = Self::from_bytes(bytes)
            .map_err(|_| FontError::Invalid(path.display().to_string()))?;
        face.source = Some(path.to_path_buf());
        Ok(face)
    }

    /// Resolve the logo font as described in the [module docs](self).
    pub fn from_config(config: &FontConfig) -> Result<Self, FontError> {
        if let Some(path) = &config.path {
            return Self::open(path);
        }
        if config.search_system {
            return Self::discover(SYSTEM_FONT_CANDIDATES.iter().map(Path::new));
        }
        Err(FontError::NotFound)
    }

    /// First candidate that exists and parses.
    pub fn discover<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Result<Self, FontError> {
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            match Self::open(path) {
                Ok(face) => {
                    tracing::debug!(font = %path.display(), "using logo font");
                    return Ok(face);
                }
                Err(e) => tracing::warn!(font = %path.display(), error = %e, "skipping font"),
            }
        }
        Err(FontError::NotFound)
    }

    /// File the font was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Lay out a single line with the em-box top at y = 0.
    fn layout(&self, text: &str, px: f32) -> Vec<PositionedGlyph<'_>> {
        let scale = Scale::uniform(px);
        let ascent = self.font.v_metrics(scale).ascent;
        self.font
            .layout(text, scale, point(0.0, ascent))
            .collect()
    }
}

impl Typeface for RustTypeFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        self.layout(text, px)
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn rasterize(&self, text: &str, px: f32) -> GlyphMask {
        let glyphs = self.layout(text, px);

        let bounds = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .reduce(|a, b| rusttype::Rect {
                min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
                max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
            });
        let Some(bounds) = bounds else {
            return GlyphMask::empty();
        };

        let width = (bounds.max.x - bounds.min.x) as u32;
        let height = (bounds.max.y - bounds.min.y) as u32;
        let mut image = GrayImage::new(width, height);

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let x = (bb.min.x - bounds.min.x) as u32 + gx;
                let y = (bb.min.y - bounds.min.y) as u32 + gy;
                if x < width && y < height {
                    let pixel = image.get_pixel_mut(x, y);
                    let value = (v * 255.0).round() as u16 + pixel[0] as u16;
                    pixel[0] = value.min(255) as u8;
                }
            });
        }

        GlyphMask {
            image,
            left: bounds.min.x,
            top: bounds.min.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = RustTypeFace::from_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(FontError::Invalid(_))));
    }

    #[test]
    fn missing_configured_path_is_an_io_error() {
        let config = FontConfig {
            path: Some("/definitely/not/here.ttf".into()),
            search_system: true,
        };
        assert!(matches!(
            RustTypeFace::from_config(&config),
            Err(FontError::Io { .. })
        ));
    }

    #[test]
    fn no_path_and_no_search_is_not_found() {
        let config = FontConfig {
            path: None,
            search_system: false,
        };
        assert!(matches!(
            RustTypeFace::from_config(&config),
            Err(FontError::NotFound)
        ));
    }

    #[test]
    fn discover_skips_missing_and_invalid_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        let missing = tmp.path().join("missing.ttf");

        let result = RustTypeFace::discover([missing.as_path(), bogus.as_path()]);
        assert!(matches!(result, Err(FontError::NotFound)));
    }

    fn system_face() -> RustTypeFace {
        RustTypeFace::discover(SYSTEM_FONT_CANDIDATES.iter().map(Path::new))
            .expect("no candidate system font installed")
    }

    #[test]
    #[ignore = "needs a bold monospace font from SYSTEM_FONT_CANDIDATES"]
    fn system_font_measures_and_rasterizes() {
        let face = system_face();
        let one = face.measure("<", 40.0);
        let three = face.measure("<<<", 40.0);
        assert!(one > 0.0);
        // monospace: advances add up
        assert!((three - 3.0 * one).abs() < 1.0);

        let mask = face.rasterize("Hacks", 40.0);
        assert!(!mask.is_empty());
        assert!(mask.image.pixels().any(|p| p[0] > 200));
        assert!(mask.top >= 0);

        assert!(face.rasterize("   ", 40.0).is_empty());
        assert_eq!(face.measure("", 40.0), 0.0);
    }

    #[test]
    #[ignore = "needs a bold monospace font from SYSTEM_FONT_CANDIDATES"]
    fn system_font_renders_branded_formats() {
        use crate::compositor::Compositor;
        use crate::decode::SourceImage;
        use crate::test_helpers::halves;
        use crate::types::{Branding, FormatDescriptor, Shape};
        use image::Rgba;

        let comp = Compositor::new(system_face());
        let source = SourceImage::from_rgba(halves(
            640,
            480,
            Rgba([40, 60, 200, 255]),
            Rgba([200, 60, 40, 255]),
        ))
        .unwrap();
        let lime = Rgba([0x8C, 0xFF, 0x00, 255]);

        for format in [
            FormatDescriptor::new("circle-profile", 1000, 1000, Shape::Circle),
            FormatDescriptor::new("li-banner", 1584, 396, Shape::Rectangle),
            FormatDescriptor::new("wa-profile", 500, 500, Shape::Rectangle),
        ] {
            let plan = comp
                .plan(source.dimensions(), &format, &Branding::default())
                .unwrap();
            let runs = &plan.logo.runs;
            assert!(runs.iter().all(|r| r.width > 0.0));
            assert_eq!(runs[1].x, runs[0].x + runs[0].width);
            assert_eq!(runs[2].x, runs[1].x + runs[1].width);

            let out = comp
                .render(&source, &format, &Branding::default())
                .unwrap();
            assert_eq!(out.dimensions(), (format.width, format.height));
            assert!(
                out.as_image().pixels().any(|p| *p == lime),
                "no accent pixels in {}",
                format.id
            );
        }
    }
}
