//! Shared test utilities: synthetic images and pixel assertions.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photo = halves(200, 100, Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 255]));
//! let png = encode(&photo, ImageFormat::Png);
//! assert_near(*photo.get_pixel(0, 0), Rgba([255, 0, 0, 255]), 0);
//! ```

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Synthetic images
// =========================================================================

/// Single flat color.
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Left half `left`, right half `right`. Makes horizontal placement visible.
pub fn halves(width: u32, height: u32, left: Rgba<u8>, right: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| if x < width / 2 { left } else { right })
}

/// Encode to bytes in `format`. JPEG drops alpha first since it cannot carry it.
pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    let dynamic = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(dynamic.to_rgb8()),
        _ => dynamic,
    };
    let mut bytes = Cursor::new(Vec::new());
    dynamic.write_to(&mut bytes, format).unwrap();
    bytes.into_inner()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert every channel of `actual` is within `tolerance` of `expected`.
pub fn assert_near(actual: Rgba<u8>, expected: Rgba<u8>, tolerance: u8) {
    for c in 0..4 {
        let diff = (actual[c] as i16 - expected[c] as i16).unsigned_abs();
        assert!(
            diff <= tolerance as u16,
            "pixel {actual:?} differs from {expected:?} by more than {tolerance} in channel {c}"
        );
    }
}
