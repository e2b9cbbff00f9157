//! The compositor: one photo in, one branded raster out.
//!
//! ## Drawing order
//!
//! ```text
//! 1. clip         circle formats only: inscribed circle
//! 2. backdrop     cover fit, blurred, darkened          (clipped)
//! 3. foreground   contain fit, sharp                    (clipped)
//! 4. gradient     black → transparent over the top band (clipped)
//! 5. release clip
//! 6. logo         three runs with drop shadow           (unclipped)
//! ```
//!
//! The logo is drawn after the clip is released, so on circular formats it
//! can reach past the circle edge. That is the intended look.
//!
//! Rendering is split into [`Compositor::plan`], which computes every
//! position without touching pixels, and the drawing pass that executes it.
//! Each render builds a fresh [`Canvas`] and hands back the finished buffer
//! only when every step has run, so a caller never observes partial output.

use crate::decode::{DecodeError, SourceImage};
use crate::imaging::calculations::{
    ClipCircle, Placement, contain_fit, cover_fit, gradient_height,
};
use crate::imaging::filters::{cover_window, darken, resample, soft_blur};
use crate::imaging::{Canvas, CompositeStyle, LogoLayout, Typeface};
use crate::types::{Branding, Color, FormatDescriptor};
use image::RgbaImage;
use image::imageops::FilterType;
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid format '{id}': {width}x{height} (width and height must be positive)")]
    InvalidFormat { id: String, width: u32, height: u32 },
}

/// Failure of a decode-then-render call. Keeps the two causes apart.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A finished export: exactly the format's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRaster {
    format_id: String,
    image: RgbaImage,
}

impl OutputRaster {
    pub fn format_id(&self) -> &str {
        &self.format_id
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Every position a render will draw at, computed without pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub canvas: (u32, u32),
    pub clip: Option<ClipCircle>,
    pub backdrop: Placement,
    pub foreground: Placement,
    pub gradient_height: f64,
    pub gradient_color: Color,
    pub logo: LogoLayout,
}

/// Result of rendering one catalog entry.
#[derive(Debug)]
pub struct CatalogRender {
    pub format: FormatDescriptor,
    pub result: Result<OutputRaster, RenderError>,
}

/// Renders branded exports with a fixed typeface and style.
pub struct Compositor<F> {
    face: F,
    style: CompositeStyle,
}

impl<F: Typeface> Compositor<F> {
    pub fn new(face: F) -> Self {
        Self::with_style(face, CompositeStyle::default())
    }

    pub fn with_style(face: F, style: CompositeStyle) -> Self {
        Self { face, style }
    }

    pub fn style(&self) -> &CompositeStyle {
        &self.style
    }

    pub fn face(&self) -> &F {
        &self.face
    }

    /// Compute the full layout for `source_dims` without drawing.
    ///
    /// Rejects formats with a zero dimension before anything else happens.
    pub fn plan(
        &self,
        source_dims: (u32, u32),
        format: &FormatDescriptor,
        branding: &Branding,
    ) -> Result<RenderPlan, RenderError> {
        if !format.is_valid() {
            return Err(RenderError::InvalidFormat {
                id: format.id.clone(),
                width: format.width,
                height: format.height,
            });
        }
        let canvas = (format.width, format.height);

        Ok(RenderPlan {
            canvas,
            clip: format.is_circle().then(|| ClipCircle::inscribed(canvas)),
            backdrop: cover_fit(source_dims, canvas),
            foreground: contain_fit(source_dims, canvas),
            gradient_height: gradient_height(format.height, format.shape, &self.style.gradient),
            gradient_color: Color::BLACK.with_opacity(self.style.gradient.top_opacity),
            logo: LogoLayout::compute(format, branding, &self.style.logo, &self.face),
        })
    }

    /// Composite `source` into `format` with `branding`.
    ///
    /// Pure function of its inputs: the same arguments always produce the
    /// same pixels.
    pub fn render(
        &self,
        source: &SourceImage,
        format: &FormatDescriptor,
        branding: &Branding,
    ) -> Result<OutputRaster, RenderError> {
        let started = Instant::now();
        let plan = self.plan(source.dimensions(), format, branding)?;
        let image = self.execute(source, &plan);

        tracing::debug!(
            format = %format.id,
            width = format.width,
            height = format.height,
            shape = ?format.shape,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered"
        );
        Ok(OutputRaster {
            format_id: format.id.clone(),
            image,
        })
    }

    fn execute(&self, source: &SourceImage, plan: &RenderPlan) -> RgbaImage {
        let (width, height) = plan.canvas;
        let mut canvas = Canvas::new(width, height, self.style.matte);

        if let Some(circle) = &plan.clip {
            canvas.clip_to_circle(circle);
        }

        let mut backdrop = cover_window(source.pixels(), &plan.backdrop, plan.canvas);
        backdrop = soft_blur(&backdrop, self.style.backdrop.blur_sigma);
        darken(&mut backdrop, self.style.backdrop.brightness);
        canvas.draw_image(&backdrop, 0, 0);

        let rect = plan.foreground.snap();
        let foreground = resample(source.pixels(), rect, FilterType::Lanczos3);
        canvas.draw_image(&foreground, rect.x, rect.y);

        canvas.fill_top_gradient(plan.gradient_height, plan.gradient_color);

        canvas.release_clip();
        plan.logo.draw(&mut canvas, &self.face);

        canvas.into_image()
    }

    /// Decode encoded bytes and render them in one step.
    pub fn compose_bytes(
        &self,
        bytes: &[u8],
        format: &FormatDescriptor,
        branding: &Branding,
    ) -> Result<OutputRaster, ComposeError> {
        let source = SourceImage::decode(bytes)?;
        Ok(self.render(&source, format, branding)?)
    }

    /// Render one source into every format, in parallel, results in input order.
    pub fn render_catalog(
        &self,
        source: &SourceImage,
        formats: &[FormatDescriptor],
        branding: &Branding,
    ) -> Vec<CatalogRender> {
        formats
            .par_iter()
            .map(|format| CatalogRender {
                format: format.clone(),
                result: self.render(source, format, branding),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::typeface::tests::BlockFace;
    use crate::test_helpers::{assert_near, encode, halves, solid};
    use crate::types::Shape;
    use image::{ImageFormat, Rgba};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn compositor() -> Compositor<BlockFace> {
        Compositor::new(BlockFace::new())
    }

    fn source(w: u32, h: u32) -> SourceImage {
        SourceImage::from_rgba(halves(w, h, RED, BLUE)).unwrap()
    }

    // =========================================================================
    // plan
    // =========================================================================

    #[test]
    fn plan_wide_source_in_square() {
        let format = FormatDescriptor::new("ig-post", 1080, 1080, Shape::Rectangle);
        let plan = compositor()
            .plan((1920, 1080), &format, &Branding::default())
            .unwrap();
        assert_eq!(plan.foreground.scale, 0.5625);
        assert_eq!(plan.foreground.height, 607.5);
        assert_eq!(plan.foreground.y, 236.25);
        assert_eq!(plan.backdrop.height, 1080.0);
        assert!(plan.clip.is_none());
        assert_eq!(plan.gradient_height, 216.0);
    }

    #[test]
    fn plan_circle_has_clip_and_wide_padding() {
        let format = FormatDescriptor::new("circle-profile", 1000, 1000, Shape::Circle);
        let plan = compositor()
            .plan((800, 600), &format, &Branding::default())
            .unwrap();
        let clip = plan.clip.unwrap();
        assert_eq!((clip.cx, clip.cy, clip.radius), (500.0, 500.0, 500.0));
        assert_eq!((plan.logo.padding_x, plan.logo.padding_y), (150.0, 150.0));
        assert_eq!(plan.gradient_height, 400.0);
    }

    #[test]
    fn plan_rejects_zero_width() {
        let format = FormatDescriptor::new("bad", 0, 500, Shape::Rectangle);
        let err = compositor()
            .plan((100, 100), &format, &Branding::default())
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidFormat {
                id: "bad".into(),
                width: 0,
                height: 500
            }
        );
    }

    #[test]
    fn invalid_format_is_rejected_before_measuring_text() {
        let comp = compositor();
        let format = FormatDescriptor::new("bad", 300, 0, Shape::Circle);
        assert!(comp.render(&source(10, 10), &format, &Branding::default()).is_err());
        assert!(comp.face().get_calls().is_empty());
    }

    // =========================================================================
    // render
    // =========================================================================

    #[test]
    fn output_matches_format_dimensions() {
        let comp = compositor();
        for (w, h) in [(120, 80), (64, 200), (33, 33)] {
            let format = FormatDescriptor::new("f", w, h, Shape::Rectangle);
            let out = comp
                .render(&source(50, 90), &format, &Branding::default())
                .unwrap();
            assert_eq!(out.dimensions(), (w, h));
            assert_eq!(out.format_id(), "f");
        }
    }

    #[test]
    fn rectangle_output_is_opaque() {
        let format = FormatDescriptor::new("f", 160, 90, Shape::Rectangle);
        let out = compositor()
            .render(&source(40, 100), &format, &Branding::default())
            .unwrap();
        assert!(out.as_image().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn same_aspect_foreground_covers_everything_below_the_band() {
        let style = CompositeStyle {
            logo: crate::imaging::LogoStyle {
                text_color: Color::TRANSPARENT,
                shadow: crate::imaging::ShadowStyle {
                    color: Color::TRANSPARENT,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let comp = Compositor::with_style(BlockFace::new(), style);
        let branding = Branding {
            accent_color: Color::TRANSPARENT,
            ..Branding::default()
        };
        let flat = SourceImage::from_rgba(solid(200, 100, Rgba([10, 200, 10, 255]))).unwrap();
        let format = FormatDescriptor::new("f", 100, 50, Shape::Rectangle);
        let out = comp.render(&flat, &format, &branding).unwrap();

        // Below the gradient band every pixel is the sharp foreground.
        for y in 10..50 {
            for x in 0..100 {
                assert_near(*out.as_image().get_pixel(x, y), Rgba([10, 200, 10, 255]), 1);
            }
        }
    }

    #[test]
    fn letterbox_shows_dark_backdrop() {
        let format = FormatDescriptor::new("f", 100, 200, Shape::Rectangle);
        let white = SourceImage::from_rgba(solid(100, 50, Rgba([255, 255, 255, 255]))).unwrap();
        let out = compositor()
            .render(&white, &format, &Branding::default())
            .unwrap();
        // Foreground band is rows 75..125; below it is backdrop at 40% brightness.
        assert_near(*out.as_image().get_pixel(50, 100), Rgba([255, 255, 255, 255]), 1);
        assert_near(*out.as_image().get_pixel(50, 180), Rgba([102, 102, 102, 255]), 2);
    }

    #[test]
    fn circle_leaves_corners_matte() {
        let format = FormatDescriptor::new("c", 120, 120, Shape::Circle);
        let comp = Compositor::with_style(
            BlockFace::new(),
            CompositeStyle {
                matte: Color::TRANSPARENT,
                ..Default::default()
            },
        );
        let out = comp
            .render(&source(300, 200), &format, &Branding::default())
            .unwrap();
        let img = out.as_image();
        assert_eq!(*img.get_pixel(119, 119), Rgba([0, 0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 119), Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(60, 100)[3], 255);
    }

    #[test]
    fn extreme_aspect_source_renders_at_canvas_size() {
        let strip = SourceImage::from_rgba(halves(30000, 1, RED, BLUE)).unwrap();
        let format = FormatDescriptor::new("ig-story", 1080, 1920, Shape::Rectangle);
        let out = compositor()
            .render(&strip, &format, &Branding::default())
            .unwrap();
        assert_eq!(out.dimensions(), (1080, 1920));
    }

    #[test]
    fn render_is_deterministic() {
        let comp = compositor();
        let format = FormatDescriptor::new("c", 90, 90, Shape::Circle);
        let src = source(70, 40);
        let a = comp.render(&src, &format, &Branding::default()).unwrap();
        let b = comp.render(&src, &format, &Branding::default()).unwrap();
        assert_eq!(a, b);
    }

    // =========================================================================
    // compose_bytes / render_catalog
    // =========================================================================

    #[test]
    fn compose_bytes_separates_decode_and_render_failures() {
        let comp = compositor();
        let good = FormatDescriptor::new("f", 40, 40, Shape::Rectangle);
        let bad = FormatDescriptor::new("f", 40, 0, Shape::Rectangle);
        let png = encode(&halves(20, 10, RED, BLUE), ImageFormat::Png);

        assert!(comp.compose_bytes(&png, &good, &Branding::default()).is_ok());
        assert!(matches!(
            comp.compose_bytes(b"nope", &good, &Branding::default()),
            Err(ComposeError::Decode(_))
        ));
        assert!(matches!(
            comp.compose_bytes(&png, &bad, &Branding::default()),
            Err(ComposeError::Render(RenderError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn catalog_keeps_order_and_reports_each_format() {
        let formats = vec![
            FormatDescriptor::new("a", 60, 60, Shape::Rectangle),
            FormatDescriptor::new("b", 0, 60, Shape::Rectangle),
            FormatDescriptor::new("c", 50, 50, Shape::Circle),
        ];
        let results = compositor().render_catalog(&source(30, 20), &formats, &Branding::default());
        let ids: Vec<&str> = results.iter().map(|r| r.format.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(results[0].result.as_ref().unwrap().dimensions(), (60, 60));
        assert!(results[1].result.is_err());
        assert_eq!(results[2].result.as_ref().unwrap().dimensions(), (50, 50));
    }
}
