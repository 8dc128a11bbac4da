//! Diagonal corner ribbons ("DEV", "BETA", ...) drawn over icons.
//!
//! The ribbon is described as SVG and rasterized through [`render_svg`], both
//! for standalone overlays on generated PNGs and for the banner layer of an
//! authored bundle.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::imaging::{load_rgba, write_png};
use crate::output::{GenerationResult, files};
use crate::svg::{composite_over, render_svg};

/// Ribbon colors for well-known environment labels, keyed by uppercase text.
const DEFAULT_COLORS: [(&str, &str); 4] = [
    ("DEV", "#4CAF50"),
    ("BETA", "#FF9800"),
    ("STAGING", "#2196F3"),
    ("ALPHA", "#9C27B0"),
];

/// Ribbon color for labels without a default.
pub const FALLBACK_COLOR: &str = "#F44336";

const RIBBON_WIDTH_RATIO: f64 = 0.42;
const RIBBON_HEIGHT_RATIO: f64 = 0.08;
const FONT_SIZE_RATIO: f64 = 0.6;

/// Outputs that never receive a banner.
const SKIP_FILES: [&str; 3] = [
    files::FAVICON,
    files::ANDROID_BACKGROUND,
    files::ANDROID_MONOCHROME,
];

// ============================================================================
// BannerPosition
// ============================================================================

/// The corner a ribbon is drawn across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum BannerPosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl BannerPosition {
    /// Ribbon center as fractions of the icon size, and its rotation in degrees.
    ///
    /// Rotation is chosen so the ribbon cuts across its corner.
    fn geometry(self) -> (f64, f64, f64) {
        match self {
            Self::TopLeft => (0.2, 0.2, -45.0),
            Self::TopRight => (0.8, 0.2, 45.0),
            Self::BottomLeft => (0.2, 0.8, 45.0),
            Self::BottomRight => (0.8, 0.8, -45.0),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for BannerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerPosition {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(IconError::format(format!(
                "Invalid banner position: {other}. Use top-left, top-right, bottom-left or bottom-right."
            ))),
        }
    }
}

// ============================================================================
// BannerOptions
// ============================================================================

/// What to write on the ribbon and where.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BannerOptions {
    pub text: String,
    /// Explicit ribbon color; derived from the text when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub position: BannerPosition,
}

impl BannerOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_position(mut self, position: BannerPosition) -> Self {
        self.position = position;
        self
    }

    /// The color the ribbon will be drawn with.
    pub fn resolved_color(&self) -> String {
        resolve_color(&self.text, self.color.as_deref())
    }
}

/// Picks the ribbon color: explicit color, then the label default, then red.
pub fn resolve_color(text: &str, color: Option<&str>) -> String {
    if let Some(color) = color {
        return color.to_string();
    }
    let key = text.to_uppercase();
    DEFAULT_COLORS
        .iter()
        .find(|(label, _)| *label == key)
        .map_or(FALLBACK_COLOR, |(_, color)| color)
        .to_string()
}

// ============================================================================
// Rendering
// ============================================================================

/// Builds the ribbon SVG for a `size x size` icon.
pub fn create_banner_svg(size: u32, text: &str, color: &str, position: BannerPosition) -> String {
    let size_f = size as f64;
    let ribbon_width = (size_f * RIBBON_WIDTH_RATIO).round();
    let ribbon_height = (size_f * RIBBON_HEIGHT_RATIO).round();
    let font_size = (ribbon_height * FONT_SIZE_RATIO).round();
    let (fx, fy, angle) = position.geometry();
    let (cx, cy) = (size_f * fx, size_f * fy);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">
  <g transform="translate({cx}, {cy}) rotate({angle})">
    <rect x="{x}" y="{y}" width="{ribbon_width}" height="{ribbon_height}" fill="{fill}"/>
    <text x="0" y="0" text-anchor="middle" dominant-baseline="central"
      font-family="Arial, Helvetica, sans-serif" font-weight="bold"
      font-size="{font_size}" fill="white">{label}</text>
  </g>
</svg>"#,
        x = -ribbon_width / 2.0,
        y = -ribbon_height / 2.0,
        fill = escape_xml(color),
        label = escape_xml(text),
    )
}

/// Rasterizes the ribbon for a `size x size` icon on a transparent canvas.
pub fn render_banner(size: u32, options: &BannerOptions) -> Result<RgbaImage> {
    let svg = create_banner_svg(size, &options.text, &options.resolved_color(), options.position);
    render_svg(&svg, size)
}

/// Draws a ribbon over the PNG at `result.file_path` and updates its size.
///
/// The new image is written to a sibling temporary file and renamed over the
/// existing one, so a failure leaves the file untouched.
pub fn apply_banner(result: &mut GenerationResult, options: &BannerOptions) -> Result<()> {
    let mut img = load_rgba(&result.file_path)?;
    let banner = render_banner(img.width(), options)?;
    composite_over(&mut img, &banner, 0, 0);

    let written = write_png(&img, &result.file_path)?;
    result.size = written.size;
    Ok(())
}

/// Returns false for outputs that must stay banner-free.
pub fn should_apply_banner(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_none_or(|name| !SKIP_FILES.contains(&name))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================
