//! Flattening a bundle into PNG images.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tempfile::TempDir;

use super::compositor::{composite_layers, prepare_layers};
use super::fill::render_fill;
use super::manifest::Manifest;
use super::{ASSETS_DIR, CANVAS_SIZE, MANIFEST_FILE};
use crate::error::{IconError, Result};
use crate::imaging::write_png;

/// File name of the composed (background + layers) image.
pub const COMPOSED_FILE: &str = "composed-icon.png";

/// File name of the layers-only image on a transparent background.
pub const FOREGROUND_FILE: &str = "foreground-icon.png";

const TEMP_PREFIX: &str = "iconwolf-compose-";

/// In-memory result of composing a bundle.
#[derive(Debug, Clone)]
pub struct ComposedImages {
    /// Fill background with every layer drawn on top.
    pub composed: RgbaImage,
    /// Layers only, on a transparent background.
    pub foreground: RgbaImage,
    /// Representative background color as `#RRGGBB`.
    pub background_color: String,
}

/// A bundle flattened to PNG files inside a private temporary directory.
///
/// The directory lives as long as this value: dropping it (or calling
/// [`close`](Self::close)) removes both images.
#[derive(Debug)]
pub struct ComposedBundle {
    pub composed_image_path: PathBuf,
    pub foreground_image_path: PathBuf,
    /// Representative background color as `#RRGGBB`.
    pub extracted_bg_color: String,
    temp_dir: TempDir,
}

impl ComposedBundle {
    /// The temporary directory holding both images.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Removes the temporary directory, reporting any failure.
    pub fn close(self) -> io::Result<()> {
        self.temp_dir.close()
    }
}

/// Composes a bundle in memory.
///
/// Fails with [`IconError::NotFound`] when the manifest or a layer asset is
/// missing. The two compositing passes run in parallel over the same
/// prepared layers.
pub fn compose_bundle(bundle_path: &Path) -> Result<ComposedImages> {
    let manifest_path = bundle_path.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(IconError::not_found(format!(
            "{MANIFEST_FILE} not found in {}",
            bundle_path.display()
        )));
    }

    let manifest = Manifest::from_json(&fs::read_to_string(&manifest_path)?)?;
    let background = render_fill(&manifest.resolve_fill()?, CANVAS_SIZE)?;
    let layers = prepare_layers(&manifest, &bundle_path.join(ASSETS_DIR), CANVAS_SIZE)?;

    log::debug!(
        "composing {} layer(s) over {} background",
        layers.len(),
        background.hex()
    );

    let background_color = background.hex();
    let mut composed = background.image;
    let mut foreground = RgbaImage::new(CANVAS_SIZE, CANVAS_SIZE);
    rayon::join(
        || composite_layers(&mut composed, &layers),
        || composite_layers(&mut foreground, &layers),
    );

    Ok(ComposedImages {
        composed,
        foreground,
        background_color,
    })
}

/// Flattens a bundle into `composed-icon.png` and `foreground-icon.png`
/// inside a fresh temporary directory.
pub fn read_bundle(bundle_path: &Path) -> Result<ComposedBundle> {
    let images = compose_bundle(bundle_path)?;

    let temp_dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
    let composed_image_path = temp_dir.path().join(COMPOSED_FILE);
    let foreground_image_path = temp_dir.path().join(FOREGROUND_FILE);

    let (composed, foreground) = rayon::join(
        || write_png(&images.composed, &composed_image_path),
        || write_png(&images.foreground, &foreground_image_path),
    );
    composed?;
    foreground?;

    Ok(ComposedBundle {
        composed_image_path,
        foreground_image_path,
        extracted_bg_color: images.background_color,
        temp_dir,
    })
}
