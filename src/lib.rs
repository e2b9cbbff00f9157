//! # Brand Frame
//!
//! Turns one photo into a set of branded social-media exports. Every export
//! has exact platform dimensions, the photo shown whole over a blurred copy of
//! itself, a darkening band across the top, and a `<Primary Accent />` logo in
//! the corner.
//!
//! # Architecture: Decode, Composite, Export
//!
//! ```text
//! 1. Decode     bytes / file     →  SourceImage     (async boundary, tokio)
//! 2. Composite  SourceImage      →  OutputRaster    (pure, one per format)
//! 3. Export     OutputRaster     →  PNG / download / share
//! ```
//!
//! Only decoding is asynchronous. Compositing is a synchronous pure function
//! of `(source, format, branding, style)`, so it can be tested pixel-for-pixel
//! and fanned out across formats with rayon.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Format descriptors, shapes, colors, branding |
//! | [`config`] | Layered `brand.toml` loading, validation, stock catalog |
//! | [`decode`] | Source image decoding, sync and async |
//! | [`compositor`] | Layout planning and the layered drawing pass |
//! | [`imaging`] | Placement math, canvas with circle clip, filters, text |
//! | [`export`] | PNG encoding, file naming, share fallback chain |
//! | [`logging`] | `tracing-subscriber` setup from config |
//!
//! # Design Decisions
//!
//! ## Text Behind a Trait
//!
//! The compositor never touches a font directly. It measures and rasterizes
//! through [`imaging::Typeface`], implemented for real by
//! [`imaging::RustTypeFace`] and in tests by a block-glyph mock that records
//! every call. Layout tests then assert exact positions without shipping a
//! font file.
//!
//! ## Plan, Then Draw
//!
//! [`compositor::Compositor::plan`] computes every rectangle, the clip circle,
//! the gradient band and the logo runs without allocating pixels. Geometry
//! tests run against the plan; pixel tests run against the finished raster.
//!
//! ## Opaque Matte
//!
//! Each canvas starts filled with `style.matte`, opaque black unless
//! configured otherwise. Circle formats therefore export with black corners by
//! default; set the matte to `#00000000` to get transparent ones.
//!
//! ## Share Always Ends Somewhere
//!
//! Sharing walks native file share, then text share, then download. Download
//! cannot be unsupported, so a share call only fails when the PNG itself
//! cannot be produced or written.

pub mod compositor;
pub mod config;
pub mod decode;
pub mod export;
pub mod imaging;
pub mod logging;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
