//! Apple Icon Composer `.icon` bundles.
//!
//! A bundle is a directory named `*.icon` holding an `icon.json` manifest and
//! an `Assets/` directory with the PNG layers the manifest references.
//!
//! # Architecture
//!
//! ```text
//!            icon.json ──► Manifest ──► Fill ──► fill::render_fill ──┐
//!                                 │                                  ▼
//!  Assets/*.png ──► compositor::prepare_layers ──► PlacedLayer[] ──► composite
//!                                                                    │
//!                        reader::read_bundle ◄── composed + foreground PNGs
//! ```
//!
//! [`writer::write_bundle`] is the inverse: it copies a source PNG into a new
//! bundle and synthesizes the manifest.

pub mod compositor;
pub mod fill;
pub mod manifest;
pub mod reader;
pub mod writer;

pub use compositor::{PlacedLayer, Placement, compute_placement};
pub use fill::{RenderedFill, render_fill};
pub use manifest::{
    Fill, FillDefinition, FillSpec, FillSpecialization, Group, Layer, Manifest, Orientation,
    Position, Shadow, Translucency, UnitPoint,
};
pub use reader::{ComposedBundle, ComposedImages, compose_bundle, read_bundle};
pub use writer::{BundleOptions, write_bundle};

use std::path::Path;

/// Edge length of the square canvas every bundle is composed on.
pub const CANVAS_SIZE: u32 = 1024;

/// Directory extension identifying a bundle.
pub const BUNDLE_EXTENSION: &str = ".icon";

/// Manifest file name at the bundle root.
pub const MANIFEST_FILE: &str = "icon.json";

/// Directory holding layer images, relative to the bundle root.
pub const ASSETS_DIR: &str = "Assets";

/// Returns true if `path` ends in `.icon`, is a directory, and directly
/// contains `icon.json`.
///
/// Filesystem errors (permissions, concurrent removal) count as `false`.
pub fn is_bundle(path: &Path) -> bool {
    if !has_bundle_extension(path) {
        return false;
    }

    match path.metadata() {
        Ok(meta) if meta.is_dir() => path.join(MANIFEST_FILE).try_exists().unwrap_or(false),
        _ => false,
    }
}

/// Returns true if `path` names a bundle, whether or not it exists yet.
pub fn has_bundle_extension(path: &Path) -> bool {
    path.to_str()
        .is_some_and(|s| s.trim_end_matches('/').ends_with(BUNDLE_EXTENSION))
}
