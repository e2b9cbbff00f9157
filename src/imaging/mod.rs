//! Pixel work for the compositor, all in pure Rust.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Cover / contain fit** | pure `f64` geometry in [`calculations`] |
//! | **Resample** | `image::imageops::resize` |
//! | **Backdrop blur** | `image::imageops::blur` on a downsampled copy |
//! | **Clip, gradient, blending** | [`Canvas`] |
//! | **Glyphs** | `rusttype` via [`RustTypeFace`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Parameters**: Style structs describing effect strength
//! - **Typeface**: [`Typeface`] trait + [`RustTypeFace`]
//! - **Canvas / filters**: pixel operations
//! - **Logo**: text layout and drawing

pub mod calculations;
pub mod canvas;
pub mod filters;
pub mod logo;
pub mod params;
pub mod rusttype_face;
pub mod typeface;

pub use calculations::{ClipCircle, PixelRect, Placement, contain_fit, cover_fit};
pub use canvas::Canvas;
pub use logo::{LogoLayout, TextRun};
pub use params::{BackdropStyle, CompositeStyle, GradientStyle, LogoStyle, ShadowStyle};
pub use rusttype_face::{FontError, RustTypeFace};
pub use typeface::{GlyphMask, Typeface};
