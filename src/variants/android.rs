//! Android adaptive icon layers.
//!
//! Android masks adaptive icons to a variety of shapes and only guarantees the
//! central 66dp of the 108dp layer to be visible. The artwork is therefore
//! shrunk into that safe zone before being centered on the full canvas.

use std::path::Path;

use image::{Rgba, RgbaImage, imageops};

use crate::color::parse_hex;
use crate::error::Result;
use crate::imaging::{grayscale, load_rgba, resize_contain, write_png};
use crate::output::{GenerationResult, files, resolve_output_path};

pub const ANDROID_ICON_SIZE: u32 = 1024;

/// Edge length of the always-visible region, `round(1024 * 66 / 108)`.
pub const SAFE_ZONE_SIZE: u32 = 626;

/// Options for [`generate_android_icons`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidOptions {
    /// Hex color of the background layer.
    pub bg_color: String,
    /// Also write the background and monochrome layers.
    pub include_background: bool,
}

impl Default for AndroidOptions {
    fn default() -> Self {
        Self {
            bg_color: "#FFFFFF".to_string(),
            include_background: true,
        }
    }
}

/// Centers the artwork inside the safe zone of a transparent canvas.
fn adaptive_foreground(src: &RgbaImage) -> RgbaImage {
    let margin = ((ANDROID_ICON_SIZE - SAFE_ZONE_SIZE) as f64 / 2.0).round() as i64;
    let artwork = resize_contain(src, SAFE_ZONE_SIZE, SAFE_ZONE_SIZE);

    let mut canvas = RgbaImage::new(ANDROID_ICON_SIZE, ANDROID_ICON_SIZE);
    imageops::overlay(&mut canvas, &artwork, margin, margin);
    canvas
}

/// Writes the adaptive icon layers.
///
/// Returns `[foreground]`, or `[foreground, background, monochrome]` when
/// `include_background` is set. The three files are rendered concurrently
/// from the same decoded source.
pub fn generate_android_icons(
    input: &Path,
    output_dir: &Path,
    options: &AndroidOptions,
) -> Result<Vec<GenerationResult>> {
    let bg_rgb = parse_hex(&options.bg_color)?;
    let foreground = adaptive_foreground(&load_rgba(input)?);

    let foreground_path = resolve_output_path(output_dir, files::ANDROID_FOREGROUND);
    if !options.include_background {
        return Ok(vec![write_png(&foreground, &foreground_path)?]);
    }

    let background_path = resolve_output_path(output_dir, files::ANDROID_BACKGROUND);
    let monochrome_path = resolve_output_path(output_dir, files::ANDROID_MONOCHROME);

    let (fg, (bg, mono)) = rayon::join(
        || write_png(&foreground, &foreground_path),
        || {
            rayon::join(
                || {
                    let solid = RgbaImage::from_pixel(
                        ANDROID_ICON_SIZE,
                        ANDROID_ICON_SIZE,
                        Rgba([bg_rgb.red, bg_rgb.green, bg_rgb.blue, 255]),
                    );
                    write_png(&solid, &background_path)
                },
                || write_png(&grayscale(&foreground), &monochrome_path),
            )
        },
    );

    Ok(vec![fg?, bg?, mono?])
}
