//! iconwolf: app icon variants for Expo / React Native projects
//!
//! This crate turns one square source image, either a PNG or an Apple Icon
//! Composer `.icon` bundle, into the icon files a cross-platform app needs:
//! the 1024px store icon, Android adaptive icon layers, a web favicon and a
//! splash icon. It can also author a `.icon` bundle from a PNG.
//!
//! # Example
//!
//! ```no_run
//! use iconwolf::{BannerOptions, GeneratorOptions, generate};
//!
//! let options = GeneratorOptions {
//!     banner: Some(BannerOptions::new("DEV")),
//!     ..GeneratorOptions::new("AppIcon.icon", "assets/images")
//! };
//! for result in generate(&options)? {
//!     println!("{} ({} bytes)", result.file_path.display(), result.size);
//! }
//! # Ok::<(), iconwolf::IconError>(())
//! ```
//!
//! # Bundles
//!
//! Reading a bundle flattens its fill and layers into two temporary PNGs:
//!
//! ```no_run
//! use std::path::Path;
//! use iconwolf::bundle::{is_bundle, read_bundle};
//!
//! let path = Path::new("AppIcon.icon");
//! if is_bundle(path) {
//!     let composed = read_bundle(path)?;
//!     println!("background {}", composed.extracted_bg_color);
//!     // Temporary images are removed when `composed` is dropped.
//! }
//! # Ok::<(), iconwolf::IconError>(())
//! ```

pub mod banner;
pub mod bundle;
pub mod color;
mod error;
pub mod generator;
pub mod imaging;
pub mod output;
mod svg;
pub mod update_check;
pub mod variants;

pub use banner::{BannerOptions, BannerPosition, apply_banner, should_apply_banner};
pub use bundle::{BundleOptions, ComposedBundle, is_bundle, read_bundle, write_bundle};
pub use color::{IconColor, color_to_hex, hex_to_color_string, parse_color, parse_hex};
pub use error::{IconError, Result};
pub use generator::{GeneratorOptions, VariantFlags, generate};
pub use imaging::{SourceImageMeta, validate_source_image};
pub use output::GenerationResult;
