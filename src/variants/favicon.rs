//! Web favicon.

use std::path::Path;

use crate::error::Result;
use crate::imaging::{apply_rounded_corners, load_rgba, resize_contain, write_png};
use crate::output::{GenerationResult, files, resolve_output_path};

pub const FAVICON_SIZE: u32 = 48;

/// Writes `favicon.png`: 48x48 with the rounded-corner mask applied.
pub fn generate_favicon(input: &Path, output_dir: &Path) -> Result<GenerationResult> {
    let output = resolve_output_path(output_dir, files::FAVICON);

    let mut img = resize_contain(&load_rgba(input)?, FAVICON_SIZE, FAVICON_SIZE);
    apply_rounded_corners(&mut img)?;

    write_png(&img, &output)
}
