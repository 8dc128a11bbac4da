//! The 1024px app store / Expo `icon.png`.

use std::path::Path;

use crate::error::Result;
use crate::imaging::resize_image;
use crate::output::{GenerationResult, files, resolve_output_path};

pub const STANDARD_ICON_SIZE: u32 = 1024;

/// Writes `icon.png`: the input contained in a transparent 1024x1024 canvas.
pub fn generate_standard_icon(input: &Path, output_dir: &Path) -> Result<GenerationResult> {
    let output = resolve_output_path(output_dir, files::ICON);
    resize_image(input, STANDARD_ICON_SIZE, STANDARD_ICON_SIZE, &output)
}
