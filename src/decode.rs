//! Source image loading.
//!
//! Decoding is the one asynchronous boundary in the system: callers await
//! [`load`] or [`decode_async`], then hand the resulting [`SourceImage`] to
//! the synchronous compositor. A failed decode never produces an image.
//!
//! All sources are normalized to 8-bit RGBA on load.

use image::{DynamicImage, RgbaImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Unreadable(#[from] image::ImageError),
    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("Decode task failed: {0}")]
    Join(String),
}

/// A decoded photo. Read-only to everything downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap pixels the caller already decoded.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, DecodeError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { width, height });
        }
        Ok(Self { pixels })
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self, DecodeError> {
        Self::from_rgba(image.into_rgba8())
    }

    /// Decode an encoded image, sniffing the format from its magic bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)?;
        let source = Self::from_dynamic(image)?;
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            bytes = bytes.len(),
            "decoded source image"
        );
        Ok(source)
    }

    /// Read and decode a file synchronously.
    pub fn open(path: &Path) -> Result<Self, DecodeError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode on the blocking pool so the caller's executor is not stalled.
pub async fn decode_async(bytes: Vec<u8>) -> Result<SourceImage, DecodeError> {
    tokio::task::spawn_blocking(move || SourceImage::decode(&bytes))
        .await
        .map_err(|e| DecodeError::Join(e.to_string()))?
}

/// Read a file and decode it off the async executor.
pub async fn load(path: impl AsRef<Path>) -> Result<SourceImage, DecodeError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    decode_async(bytes).await
}
