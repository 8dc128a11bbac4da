//! Splash screen artwork.

use std::path::Path;

use crate::error::Result;
use crate::imaging::resize_image;
use crate::output::{GenerationResult, files, resolve_output_path};

pub const SPLASH_ICON_SIZE: u32 = 1024;

/// Writes `splash-icon.png` at 1024x1024 with transparent padding.
///
/// The caller picks the input: a dedicated splash image, a bundle's
/// foreground, or the main icon.
pub fn generate_splash_icon(input: &Path, output_dir: &Path) -> Result<GenerationResult> {
    let output = resolve_output_path(output_dir, files::SPLASH_ICON);
    resize_image(input, SPLASH_ICON_SIZE, SPLASH_ICON_SIZE, &output)
}
