//! Color codec for Icon Composer manifests.
//!
//! Manifests store colors as `"<space>:r,g,b,a"` with each channel a decimal
//! fraction in `0..=1`, e.g. `"srgb:1.00000,0.00000,0.00000,1.00000"`. The
//! color space tag is recorded but never used for conversion: `display-p3`
//! values are interpreted numerically as sRGB.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;

use crate::error::{IconError, Result};

/// Color space written by [`hex_to_color_string`].
pub const DEFAULT_COLOR_SPACE: &str = "srgb";

/// A parsed manifest color: 8-bit RGB channels plus fractional opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct IconColor {
    /// The color space tag as written in the manifest (`srgb`, `display-p3`, ...).
    pub space: String,
    /// Channels converted with `round(x * 255)`.
    pub rgb: Srgb<u8>,
    /// Opacity in `0..=1`.
    pub alpha: f32,
}

impl IconColor {
    /// Returns the RGBA bytes of this color, alpha scaled to `0..=255`.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            self.rgb.red,
            self.rgb.green,
            self.rgb.blue,
            channel_to_u8(self.alpha as f64),
        ]
    }

    /// Returns the `#RRGGBB` form of the RGB channels, ignoring opacity.
    pub fn to_hex(&self) -> String {
        color_to_hex(self.rgb)
    }
}

impl FromStr for IconColor {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

impl fmt::Display for IconColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:.5},{:.5},{:.5},{:.5}",
            self.space,
            self.rgb.red as f64 / 255.0,
            self.rgb.green as f64 / 255.0,
            self.rgb.blue as f64 / 255.0,
            self.alpha,
        )
    }
}

/// Parses a manifest color string of the form `space:r,g,b,a`.
///
/// The space must be a non-empty identifier (letters, digits, `_`, `-`) and
/// exactly four components must follow, each made only of digits and dots.
pub fn parse_color(s: &str) -> Result<IconColor> {
    let unsupported = || IconError::format(format!("Unsupported color format: {s}"));

    let (space, components) = s.split_once(':').ok_or_else(unsupported)?;
    let valid_space = !space.is_empty()
        && space
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_space {
        return Err(unsupported());
    }

    let mut values = [0.0f64; 4];
    let mut count = 0;
    for part in components.split(',') {
        if count == values.len()
            || part.is_empty()
            || !part.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(unsupported());
        }
        values[count] = part.parse().map_err(|_| unsupported())?;
        count += 1;
    }
    if count != values.len() {
        return Err(unsupported());
    }

    let [r, g, b, a] = values;
    Ok(IconColor {
        space: space.to_string(),
        rgb: Srgb::new(channel_to_u8(r), channel_to_u8(g), channel_to_u8(b)),
        alpha: a as f32,
    })
}

/// Formats RGB bytes as uppercase `#RRGGBB`.
pub fn color_to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
}

/// Parses `#RGB`, `#RRGGBB`, `RGB` or `RRGGBB` into RGB bytes.
pub fn parse_hex(hex: &str) -> Result<Srgb<u8>> {
    let cleaned = hex.strip_prefix('#').unwrap_or(hex);

    let expanded: String = match cleaned.len() {
        3 => cleaned.chars().flat_map(|c| [c, c]).collect(),
        6 => cleaned.to_string(),
        _ => {
            return Err(IconError::format(format!(
                "Invalid hex color: {hex}. Use #RGB or #RRGGBB format."
            )));
        }
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IconError::format(format!(
            "Invalid hex color: {hex}. Contains non-hex characters."
        )));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| {
            IconError::format(format!(
                "Invalid hex color: {hex}. Contains non-hex characters."
            ))
        })
    };

    Ok(Srgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Converts a hex color to an opaque `srgb:` manifest color string.
pub fn hex_to_color_string(hex: &str) -> Result<String> {
    hex_to_color_string_in(hex, DEFAULT_COLOR_SPACE)
}

/// Converts a hex color to an opaque manifest color string tagged with `space`.
///
/// Each channel is written as `value / 255` with five decimals.
pub fn hex_to_color_string_in(hex: &str, space: &str) -> Result<String> {
    let rgb = parse_hex(hex)?;
    let color = IconColor {
        space: space.to_string(),
        rgb,
        alpha: 1.0,
    };
    Ok(color.to_string())
}

fn channel_to_u8(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
