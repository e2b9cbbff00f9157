//! Shared descriptor types passed into every render.
//!
//! Formats and branding are plain immutable values: the catalog is loaded once
//! (see [`config`](crate::config)) and one entry is handed to the compositor per
//! render call. Nothing here holds pixels.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outline of the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    /// Content is clipped to the largest centered circle.
    Circle,
}

/// Social platform a catalog entry targets. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    LinkedIn,
    Instagram,
    WhatsApp,
    #[default]
    Generic,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::WhatsApp => "WhatsApp",
            Platform::Generic => "Generic",
        };
        f.write_str(name)
    }
}

/// A fixed output format: exact pixel dimensions plus shape.
///
/// `id` doubles as the suffix of exported file names
/// (`AutonomousHacks_ig-post.png`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub platform: Platform,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub shape: Shape,
}

impl FormatDescriptor {
    /// Ad-hoc format outside the catalog. `name` defaults to the id.
    pub fn new(id: impl Into<String>, width: u32, height: u32, shape: Shape) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            platform: Platform::Generic,
            width,
            height,
            shape,
        }
    }

    pub fn is_circle(&self) -> bool {
        self.shape == Shape::Circle
    }

    /// Both dimensions are strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}': expected #RGB, #RRGGBB or #RRGGBBAA")]
pub struct ColorError(pub String);

/// An sRGB color with straight (non-premultiplied) alpha.
///
/// Serialized as a CSS hex string so config files read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        let err = || ColorError(input.to_string());
        let hex = input.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgb[i] = v * 17;
                }
                Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 | 8 => {
                let mut out = [255u8; 4];
                for i in 0..hex.len() / 2 {
                    out[i] = channel(&hex[i * 2..i * 2 + 2])?;
                }
                Ok(Self(out))
            }
            _ => Err(err()),
        }
    }

    /// Uppercase `#RRGGBB`, with `AA` appended only when not opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Same color with alpha scaled by `opacity` (0.0–1.0).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let [r, g, b, a] = self.0;
        let a = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self([r, g, b, a])
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.0)
    }
}

/// The logo rendered on every export: `<primary` `accent` `/>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Branding {
    pub primary_text: String,
    pub accent_text: String,
    pub accent_color: Color,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_text: "Autonomous".to_string(),
            accent_text: "Hacks".to_string(),
            accent_color: Color::rgb(0x8C, 0xFF, 0x00),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Color parsing
    // =========================================================================

    #[test]
    fn parse_six_digit_hex() {
        assert_eq!(Color::parse_hex("#8CFF00").unwrap(), Color::rgb(140, 255, 0));
        assert_eq!(Color::parse_hex("8cff00").unwrap(), Color::rgb(140, 255, 0));
    }

    #[test]
    fn parse_short_hex_expands_nibbles() {
        assert_eq!(Color::parse_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse_hex("#a0c").unwrap(), Color::rgb(0xAA, 0x00, 0xCC));
    }

    #[test]
    fn parse_hex_with_alpha() {
        assert_eq!(
            Color::parse_hex("#000000E6").unwrap(),
            Color([0, 0, 0, 0xE6])
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Color::parse_hex("").is_err());
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#gg0000").is_err());
        assert!(Color::parse_hex("#ééé").is_err());
        assert!(Color::parse_hex("#+f+f+f").is_err());
        assert!(Color::parse_hex("+fff").is_err());
        assert!(Color::parse_hex("#+12345").is_err());
    }

    #[test]
    fn hex_output_omits_opaque_alpha() {
        assert_eq!(Color::rgb(140, 255, 0).to_hex(), "#8CFF00");
        assert_eq!(Color([1, 2, 3, 4]).to_hex(), "#01020304");
    }

    #[test]
    fn with_opacity_scales_alpha() {
        assert_eq!(Color::BLACK.with_opacity(0.9).alpha(), 230);
        assert_eq!(Color::BLACK.with_opacity(2.0).alpha(), 255);
    }

    // =========================================================================
    // Descriptors
    // =========================================================================

    #[test]
    fn format_validity() {
        assert!(FormatDescriptor::new("a", 1, 1, Shape::Rectangle).is_valid());
        assert!(!FormatDescriptor::new("a", 0, 500, Shape::Rectangle).is_valid());
        assert!(!FormatDescriptor::new("a", 500, 0, Shape::Circle).is_valid());
    }

    #[test]
    fn format_deserializes_shape_and_platform() {
        let toml = r#"
id = "circle-profile"
name = "Circular Profile"
platform = "Generic"
width = 1000
height = 1000
shape = "circle"
"#;
        let format: FormatDescriptor = toml::from_str(toml).unwrap();
        assert!(format.is_circle());
        assert_eq!(format.platform, Platform::Generic);
    }

    #[test]
    fn negative_dimensions_fail_to_deserialize() {
        let toml = r#"
id = "bad"
name = "Bad"
width = -10
height = 100
"#;
        assert!(toml::from_str::<FormatDescriptor>(toml).is_err());
    }

    #[test]
    fn branding_color_round_trips_through_toml() {
        let branding = Branding::default();
        let text = toml::to_string(&branding).unwrap();
        assert!(text.contains("accent_color = \"#8CFF00\""));
        let back: Branding = toml::from_str(&text).unwrap();
        assert_eq!(back, branding);
    }

    #[test]
    fn branding_rejects_invalid_color() {
        let toml = r#"
primary_text = "A"
accent_text = "B"
accent_color = "lime"
"#;
        assert!(toml::from_str::<Branding>(toml).is_err());
    }
}
