//! Whole-image pixel filters built on `image::imageops`.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Resample | `imageops::resize` with `Lanczos3` (foreground) or `Triangle` (backdrop) |
//! | Crop | `imageops::crop_imm` |
//! | Blur | `imageops::blur`, run on a downsampled copy for large radii |
//! | Brightness | per-pixel RGB multiply |

use super::calculations::{PixelRect, Placement};
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};

/// Largest sigma blurred at full resolution. Bigger blurs run on a copy
/// downsampled so the working sigma stays near this value.
const WORKING_SIGMA: f32 = 4.0;

/// Resample `source` to the exact size of `rect`.
pub fn resample(source: &RgbaImage, rect: PixelRect, filter: FilterType) -> RgbaImage {
    if source.dimensions() == (rect.width, rect.height) {
        return source.clone();
    }
    imageops::resize(source, rect.width, rect.height, filter)
}

/// Cover-fit `source` and cut out the canvas-sized window.
///
/// The window is located in source coordinates and cropped before any
/// scaling, so memory stays proportional to the canvas whatever the cover
/// scale is.
pub fn cover_window(source: &RgbaImage, placement: &Placement, canvas: (u32, u32)) -> RgbaImage {
    let (src_w, src_h) = source.dimensions();
    let (left, width) = source_span(src_w, canvas.0, placement.scale);
    let (top, height) = source_span(src_h, canvas.1, placement.scale);

    let window = imageops::crop_imm(source, left, top, width, height).to_image();
    let rect = PixelRect {
        x: 0,
        y: 0,
        width: canvas.0,
        height: canvas.1,
    };
    resample(&window, rect, FilterType::Triangle)
}

/// Centered run of source pixels that maps onto `canvas_len` output pixels.
///
/// Returns `(offset, length)`, at least one pixel long and inside the source.
fn source_span(source_len: u32, canvas_len: u32, scale: f64) -> (u32, u32) {
    let wanted = canvas_len as f64 / scale;
    let length = (wanted.round() as u32).clamp(1, source_len);
    let offset = ((source_len as f64 - wanted) / 2.0).round().max(0.0) as u32;
    (offset.min(source_len - length), length)
}

/// Gaussian blur with standard deviation `sigma`.
///
/// Large sigmas are applied to a downsampled copy and scaled back up, which
/// is visually indistinguishable for backdrop use and far cheaper.
pub fn soft_blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    let factor = (sigma / WORKING_SIGMA).floor().max(1.0) as u32;
    if factor == 1 || w < factor * 2 || h < factor * 2 {
        return imageops::blur(image, sigma);
    }

    let small = imageops::resize(image, w / factor, h / factor, FilterType::Triangle);
    let blurred = imageops::blur(&small, sigma / factor as f32);
    imageops::resize(&blurred, w, h, FilterType::Triangle)
}

/// Multiply RGB by `factor`, leaving alpha untouched.
pub fn darken(image: &mut RgbaImage, factor: f32) {
    let factor = factor.max(0.0);
    for pixel in image.pixels_mut() {
        for c in &mut pixel.0[..3] {
            *c = (*c as f32 * factor).round().min(255.0) as u8;
        }
    }
}

/// Blur a coverage mask, padding it first so the blur can spread.
///
/// Returns the blurred mask and the padding added on each side.
pub fn blur_mask(mask: &GrayImage, sigma: f32) -> (GrayImage, u32) {
    if sigma <= 0.0 {
        return (mask.clone(), 0);
    }
    let pad = (sigma * 3.0).ceil() as u32;
    let mut padded = GrayImage::from_pixel(mask.width() + pad * 2, mask.height() + pad * 2, Luma([0]));
    imageops::replace(&mut padded, mask, pad as i64, pad as i64);
    (imageops::blur(&padded, sigma), pad)
}
