//! Getting a finished raster out: PNG bytes, download, share.
//!
//! ## Share fallback chain
//!
//! Sharing is a prioritized list of strategies, each checked against the host
//! at call time:
//!
//! ```text
//! 1. NativeFiles   host can share this PNG file  → share file + title/text
//! 2. TextOnly      host can share at all         → share title/text/url, no image
//! 3. Download      always available              → save the PNG
//! ```
//!
//! A strategy the host cannot perform is skipped in favor of the next one. A
//! strategy that is attempted and fails (a cancelled share sheet, say) goes
//! straight to download, so the user is never offered a second share without
//! the image. Download terminates the chain, so every share call leaves the
//! user with *some* output unless the PNG itself cannot be produced or saved.

use crate::compositor::OutputRaster;
use crate::config::{ExportConfig, ShareConfig};
use crate::types::FormatDescriptor;
use image::ImageFormat;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PNG_MIME: &str = "image/png";

/// Shown when the chain had to fall back to a download because nothing can share.
pub const DOWNLOAD_NOTICE: &str =
    "Share API not supported. Image has been downloaded to your device.";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failure reported by a share host. Recorded, then the PNG is downloaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ShareError(pub String);

/// An encoded export ready to hand to a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Title/text/url accompanying a share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

/// Platform share capabilities. Implemented by the embedding application.
pub trait ShareHost {
    /// Whether this particular file can be shared natively.
    fn can_share_files(&self, file: &ShareFile) -> bool;

    fn share_files(&self, file: &ShareFile, payload: &SharePayload) -> Result<(), ShareError>;

    /// Whether any (text) sharing is available.
    fn can_share(&self) -> bool;

    fn share_text(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// A host with no share capability at all. The chain always ends in download.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShare;

impl ShareHost for NoShare {
    fn can_share_files(&self, _file: &ShareFile) -> bool {
        false
    }

    fn share_files(&self, _file: &ShareFile, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError("sharing is not supported".into()))
    }

    fn can_share(&self) -> bool {
        false
    }

    fn share_text(&self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError("sharing is not supported".into()))
    }
}

/// Where downloads go.
pub trait Downloader {
    /// Persist `file`, returning where it ended up.
    fn download(&self, file: &ShareFile) -> Result<PathBuf, ExportError>;
}

/// Saves downloads into a directory under the file's own name.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, file: &ShareFile) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(&file.name);
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(&path, &file.bytes).map_err(io_err)?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "downloaded");
        Ok(path)
    }
}

/// One step of the share chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStrategy {
    NativeFiles,
    TextOnly,
    Download,
}

impl fmt::Display for ShareStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareStrategy::NativeFiles => "native file share",
            ShareStrategy::TextOnly => "text share",
            ShareStrategy::Download => "download",
        };
        f.write_str(name)
    }
}

/// Share strategies tried, in order, before the terminal download.
pub const SHARE_ATTEMPTS: [ShareStrategy; 2] =
    [ShareStrategy::NativeFiles, ShareStrategy::TextOnly];

/// Why a strategy did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unsupported,
    Failed(ShareError),
}

/// What a share call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOutcome {
    pub strategy: ShareStrategy,
    /// Strategies passed over before `strategy`, in chain order.
    pub skipped: Vec<(ShareStrategy, SkipReason)>,
    /// Set when the chain ended in a download.
    pub saved_to: Option<PathBuf>,
    /// User-facing message, if one should be shown.
    pub notice: Option<&'static str>,
}

/// Encode a raster as PNG.
pub fn encode_png(raster: &OutputRaster) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    raster.as_image().write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Names files and drives download/share using the export and share config.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    export: ExportConfig,
    share: ShareConfig,
}

impl Exporter {
    pub fn new(export: ExportConfig, share: ShareConfig) -> Self {
        Self { export, share }
    }

    /// `<prefix>_<format id>.png`
    pub fn file_name(&self, format_id: &str) -> String {
        format!("{}_{}.png", self.export.file_prefix, format_id)
    }

    /// Encode `raster` into a named PNG file object.
    pub fn share_file(&self, raster: &OutputRaster) -> Result<ShareFile, ExportError> {
        Ok(ShareFile {
            name: self.file_name(raster.format_id()),
            mime: PNG_MIME,
            bytes: encode_png(raster)?,
        })
    }

    /// Payload sent along with the image on a native file share.
    pub fn file_payload(&self) -> SharePayload {
        SharePayload {
            title: self.share.title.clone(),
            text: self.share.text.clone(),
            url: None,
        }
    }

    /// Payload for hosts that can only share text.
    pub fn text_payload(&self) -> SharePayload {
        SharePayload {
            title: self.share.fallback_title.clone(),
            text: self.share.fallback_text.clone(),
            url: self.share.url.clone(),
        }
    }

    /// Encode and save directly.
    pub fn download(
        &self,
        raster: &OutputRaster,
        downloader: &impl Downloader,
    ) -> Result<PathBuf, ExportError> {
        let file = self.share_file(raster)?;
        downloader.download(&file)
    }

    /// Walk the [share chain](self) until a strategy succeeds.
    pub fn share(
        &self,
        raster: &OutputRaster,
        host: &impl ShareHost,
        downloader: &impl Downloader,
    ) -> Result<ShareOutcome, ExportError> {
        let file = self.share_file(raster)?;
        let mut skipped = Vec::new();

        for strategy in SHARE_ATTEMPTS {
            let Some(attempt) = self.attempt(strategy, &file, host) else {
                skipped.push((strategy, SkipReason::Unsupported));
                continue;
            };
            match attempt {
                Ok(()) => {
                    tracing::info!(%strategy, file = %file.name, "shared");
                    return Ok(ShareOutcome {
                        strategy,
                        skipped,
                        saved_to: None,
                        notice: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(%strategy, error = %e, "share failed, downloading instead");
                    skipped.push((strategy, SkipReason::Failed(e)));
                    break;
                }
            }
        }

        let unsupported = skipped
            .iter()
            .all(|(_, reason)| *reason == SkipReason::Unsupported);
        let path = downloader.download(&file)?;
        Ok(ShareOutcome {
            strategy: ShareStrategy::Download,
            skipped,
            saved_to: Some(path),
            notice: unsupported.then_some(DOWNLOAD_NOTICE),
        })
    }

    /// Run one share strategy. `None` when the host cannot perform it.
    fn attempt(
        &self,
        strategy: ShareStrategy,
        file: &ShareFile,
        host: &impl ShareHost,
    ) -> Option<Result<(), ShareError>> {
        match strategy {
            ShareStrategy::NativeFiles if host.can_share_files(file) => {
                Some(host.share_files(file, &self.file_payload()))
            }
            ShareStrategy::TextOnly if host.can_share() => {
                Some(host.share_text(&self.text_payload()))
            }
            _ => None,
        }
    }
}

/// File name for a catalog entry under the default export config.
pub fn default_file_name(format: &FormatDescriptor) -> String {
    Exporter::default().file_name(&format.id)
}
