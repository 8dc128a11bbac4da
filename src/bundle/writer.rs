//! Authoring a bundle from a single foreground image.
//!
//! # Layout
//!
//! ```text
//! Output.icon/
//! ├── icon.json
//! └── Assets/
//!     ├── foreground.png
//!     └── banner.png      (only with a banner)
//! ```
//!
//! The bundle is assembled in a staging directory next to the output and
//! renamed into place once every file is written.

use std::fs;
use std::path::Path;

use serde_json::json;

use super::manifest::{Layer, Manifest};
use super::{ASSETS_DIR, CANVAS_SIZE, MANIFEST_FILE, is_bundle};
use crate::banner::{BannerOptions, render_banner};
use crate::color::hex_to_color_string;
use crate::error::{IconError, Result};
use crate::imaging::write_png;
use crate::output::GenerationResult;

/// Asset name of the copied source image.
pub const FOREGROUND_ASSET: &str = "foreground.png";

/// Asset name of the rendered ribbon.
pub const BANNER_ASSET: &str = "banner.png";

const STAGING_PREFIX: &str = ".iconwolf-bundle-";

/// Colors and decorations for an authored bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Background hex color (light appearance when `dark_bg_color` is set).
    pub bg_color: String,
    /// Dark appearance background; emits `fill-specializations` when set.
    pub dark_bg_color: Option<String>,
    pub banner: Option<BannerOptions>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            bg_color: "#FFFFFF".to_string(),
            dark_bg_color: None,
            banner: None,
        }
    }
}

/// Writes a new bundle at `output_path` with `source` as its only artwork.
///
/// The source is copied unmodified; callers validate it first. Colors are
/// checked before anything touches the disk. An existing bundle at
/// `output_path` is replaced; any other existing file or directory there is
/// a validation error and is left alone.
///
/// The reported size is the sum of the written files; width and height are
/// the canvas size.
pub fn write_bundle(
    source: &Path,
    output_path: &Path,
    options: &BundleOptions,
) -> Result<GenerationResult> {
    if !source.is_file() {
        return Err(IconError::not_found(format!(
            "Input file not found: {}",
            source.display()
        )));
    }

    let light = hex_to_color_string(&options.bg_color)?;
    let dark = options
        .dark_bg_color
        .as_deref()
        .map(hex_to_color_string)
        .transpose()?;

    if output_path.exists() && !is_bundle(output_path) {
        return Err(IconError::validation(format!(
            "Output path exists and is not an Icon Composer bundle: {}",
            output_path.display()
        )));
    }

    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)?;

    let assets = staging.path().join(ASSETS_DIR);
    fs::create_dir(&assets)?;
    fs::copy(source, assets.join(FOREGROUND_ASSET))?;

    let mut layers = vec![Layer::new(FOREGROUND_ASSET, "foreground")];
    if let Some(banner) = &options.banner {
        let ribbon = render_banner(CANVAS_SIZE, banner)?;
        write_png(&ribbon, &assets.join(BANNER_ASSET))?;
        layers.push(Layer::new(BANNER_ASSET, "banner"));
    }

    let manifest = Manifest::new(layers);
    let manifest = match dark {
        Some(dark) => manifest.with_appearance_fills(light, dark),
        None => manifest.with_solid_fill(light),
    }
    .with_supported_platforms(json!({ "squares": "shared" }));
    fs::write(
        staging.path().join(MANIFEST_FILE),
        manifest.to_json_pretty()?,
    )?;

    if is_bundle(output_path) {
        log::debug!("replacing existing bundle {}", output_path.display());
        fs::remove_dir_all(output_path)?;
    }
    fs::rename(staging.path(), output_path)?;

    let assets = output_path.join(ASSETS_DIR);
    let mut size = fs::metadata(assets.join(FOREGROUND_ASSET))?.len()
        + fs::metadata(output_path.join(MANIFEST_FILE))?.len();
    if options.banner.is_some() {
        size += fs::metadata(assets.join(BANNER_ASSET))?.len();
    }

    Ok(GenerationResult {
        file_path: output_path.to_path_buf(),
        width: CANVAS_SIZE,
        height: CANVAS_SIZE,
        size,
    })
}
