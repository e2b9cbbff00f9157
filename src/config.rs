//! Brand configuration.
//!
//! Handles loading, validating, and merging `brand.toml`. Stock defaults are
//! serialized to a TOML value and the user's file is merged on top, so a
//! config file only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [branding]
//! primary_text = "Autonomous"
//! accent_text = "Hacks"
//! accent_color = "#8CFF00"
//!
//! [style]
//! matte = "#000000"          # Canvas fill before anything is drawn
//!
//! [style.backdrop]
//! blur_sigma = 20.0
//! brightness = 0.4
//!
//! [font]
//! # path = "/usr/share/fonts/JetBrainsMono-Bold.ttf"
//! search_system = true
//!
//! [export]
//! file_prefix = "AutonomousHacks"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! ## Formats
//!
//! `[[formats]]` is an array, so a user file that declares any formats
//! replaces the whole stock catalog rather than extending it:
//!
//! ```toml
//! [[formats]]
//! id = "square"
//! name = "Square"
//! width = 800
//! height = 800
//! shape = "circle"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::CompositeStyle;
use crate::types::{Branding, FormatDescriptor, Platform, Shape};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name looked up by [`load_config`].
pub const CONFIG_FILE: &str = "brand.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything the generator needs besides the photo.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandConfig {
    pub branding: Branding,
    /// Output catalog, in display order.
    pub formats: Vec<FormatDescriptor>,
    pub style: CompositeStyle,
    pub font: FontConfig,
    pub export: ExportConfig,
    pub share: ShareConfig,
    pub logging: LoggingConfig,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            formats: default_catalog(),
            style: CompositeStyle::default(),
            font: FontConfig::default(),
            export: ExportConfig::default(),
            share: ShareConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BrandConfig {
    /// Look up a catalog entry by id.
    pub fn find_format(&self, id: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.formats.is_empty() {
            return Err(ConfigError::Validation("formats must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for format in &self.formats {
            if format.id.is_empty() {
                return Err(ConfigError::Validation("format id must not be empty".into()));
            }
            if !seen.insert(format.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate format id '{}'",
                    format.id
                )));
            }
            if !format.is_valid() {
                return Err(ConfigError::Validation(format!(
                    "format '{}' must have positive width and height",
                    format.id
                )));
            }
        }

        let style = &self.style;
        if !(0.0..=1.0).contains(&style.backdrop.brightness) {
            return Err(ConfigError::Validation(
                "style.backdrop.brightness must be 0-1".into(),
            ));
        }
        if style.backdrop.blur_sigma < 0.0 || style.logo.shadow.blur < 0.0 {
            return Err(ConfigError::Validation("blur radii must not be negative".into()));
        }
        let fractions = [
            style.gradient.rectangle_fraction,
            style.gradient.circle_fraction,
            style.logo.rectangle_padding,
            style.logo.circle_padding,
        ];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f))
            || !(0.0..=1.0).contains(&style.gradient.top_opacity)
        {
            return Err(ConfigError::Validation(
                "gradient and padding fractions must be 0-1".into(),
            ));
        }
        if style.logo.min_font_px <= 0.0 || style.logo.min_font_px > style.logo.max_font_px {
            return Err(ConfigError::Validation(
                "style.logo font sizes need 0 < min_font_px <= max_font_px".into(),
            ));
        }

        let prefix = &self.export.file_prefix;
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "export.file_prefix must be non-empty and contain no path separators".into(),
            ));
        }
        Ok(())
    }
}

/// The stock output catalog.
pub fn default_catalog() -> Vec<FormatDescriptor> {
    let entry = |id: &str, name: &str, platform, width, height, shape| FormatDescriptor {
        id: id.into(),
        name: name.into(),
        platform,
        width,
        height,
        shape,
    };
    vec![
        entry("ig-post", "Instagram Post", Platform::Instagram, 1080, 1080, Shape::Rectangle),
        entry("circle-profile", "Circular Profile", Platform::Generic, 1000, 1000, Shape::Circle),
        entry(
            "ig-story",
            "Instagram Story / WhatsApp Status",
            Platform::Instagram,
            1080,
            1920,
            Shape::Rectangle,
        ),
        entry("li-banner", "LinkedIn Banner", Platform::LinkedIn, 1584, 396, Shape::Rectangle),
        entry("li-post", "LinkedIn Post", Platform::LinkedIn, 1200, 627, Shape::Rectangle),
        entry("wa-profile", "WhatsApp Profile", Platform::WhatsApp, 500, 500, Shape::Rectangle),
    ]
}

/// Where the logo typeface comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Explicit TTF/OTF file. Takes precedence over discovery.
    pub path: Option<PathBuf>,
    /// Probe well-known system font locations when `path` is unset.
    pub search_system: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_system: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Exports are named `<file_prefix>_<format id>.png`.
    pub file_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "AutonomousHacks".into(),
        }
    }
}

/// Text sent along with shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Used with a native file share.
    pub title: String,
    pub text: String,
    /// Used when only text can be shared.
    pub fallback_title: String,
    pub fallback_text: String,
    pub url: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "AutonomousHacks Branding".into(),
            text: "Check out my branded asset for AutonomousHacks! #AutonomousHacks #AI #Hacking"
                .into(),
            fallback_title: "AutonomousHacks Branding Generator".into(),
            fallback_text: "I just generated my branded asset for AutonomousHacks!".into(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BrandConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BrandConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BrandConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a file, falling back to stock defaults if it is absent.
///
/// A directory is treated as containing [`CONFIG_FILE`].
pub fn load_config(path: &Path) -> Result<BrandConfig, ConfigError> {
    let file = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(&file)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(
        path = %file.display(),
        formats = config.formats.len(),
        "loaded brand config"
    );
    Ok(config)
}

/// Returns a fully-commented stock `brand.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Brand Frame Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Logo text
# ---------------------------------------------------------------------------
# Rendered as: <primary_text  accent_text  />
# with accent_text drawn in accent_color.
[branding]
primary_text = "Autonomous"
accent_text = "Hacks"
accent_color = "#8CFF00"        # #RGB, #RRGGBB or #RRGGBBAA

# ---------------------------------------------------------------------------
# Compositing
# ---------------------------------------------------------------------------
[style]
# Canvas fill before drawing. Shows outside the circle on circular formats.
# Use "#00000000" for transparent corners.
matte = "#000000"

[style.backdrop]
blur_sigma = 20.0               # Gaussian blur of the cover-fit background
brightness = 0.4                # Multiplier on backdrop RGB (0-1)

[style.gradient]
top_opacity = 0.5               # Black opacity at the top edge
rectangle_fraction = 0.2        # Band height as a fraction of canvas height
circle_fraction = 0.4

[style.logo]
font_scale = 0.05               # Font size as a fraction of canvas width
min_font_px = 24.0
max_font_px = 60.0
rectangle_padding = 0.05        # Inset from the top-left, fraction of each side
circle_padding = 0.15           # Larger so the logo sits inside the circle
text_color = "#FFFFFF"

[style.logo.shadow]
color = "#000000E6"
blur = 15.0
offset_x = 3.0
offset_y = 3.0

# ---------------------------------------------------------------------------
# Font
# ---------------------------------------------------------------------------
[font]
# path = "/path/to/JetBrainsMono-Bold.ttf"
search_system = true            # Probe common system font locations

# ---------------------------------------------------------------------------
# Export and sharing
# ---------------------------------------------------------------------------
[export]
file_prefix = "AutonomousHacks" # Files are named <prefix>_<format id>.png

[share]
title = "AutonomousHacks Branding"
text = "Check out my branded asset for AutonomousHacks! #AutonomousHacks #AI #Hacking"
fallback_title = "AutonomousHacks Branding Generator"
fallback_text = "I just generated my branded asset for AutonomousHacks!"
# url = "https://example.com"

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
level = "info"                  # Overridden by RUST_LOG when set
json = false

# ---------------------------------------------------------------------------
# Output catalog
# ---------------------------------------------------------------------------
# Declaring any [[formats]] replaces the whole catalog.
# shape is "rectangle" (default) or "circle".
# platform is one of LinkedIn, Instagram, WhatsApp, Generic (default).

[[formats]]
id = "ig-post"
name = "Instagram Post"
platform = "Instagram"
width = 1080
height = 1080
shape = "rectangle"

[[formats]]
id = "circle-profile"
name = "Circular Profile"
platform = "Generic"
width = 1000
height = 1000
shape = "circle"

[[formats]]
id = "ig-story"
name = "Instagram Story / WhatsApp Status"
platform = "Instagram"
width = 1080
height = 1920
shape = "rectangle"

[[formats]]
id = "li-banner"
name = "LinkedIn Banner"
platform = "LinkedIn"
width = 1584
height = 396
shape = "rectangle"

[[formats]]
id = "li-post"
name = "LinkedIn Post"
platform = "LinkedIn"
width = 1200
height = 627
shape = "rectangle"

[[formats]]
id = "wa-profile"
name = "WhatsApp Profile"
platform = "WhatsApp"
width = 500
height = 500
shape = "rectangle"
"##
}
