//! End-to-end icon generation: resolve inputs, validate, run the selected
//! variant generators, decorate with a banner, and report.
//!
//! # Example
//!
//! ```no_run
//! use iconwolf::{GeneratorOptions, VariantFlags, generate};
//!
//! let options = GeneratorOptions {
//!     variants: VariantFlags { favicon: true, ..VariantFlags::default() },
//!     ..GeneratorOptions::new("AppIcon.icon", "assets/images")
//! };
//! let results = generate(&options)?;
//! assert_eq!(results.len(), 1);
//! # Ok::<(), iconwolf::IconError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::banner::{BannerOptions, apply_banner, should_apply_banner};
use crate::bundle::{
    BundleOptions, ComposedBundle, has_bundle_extension, is_bundle, read_bundle, write_bundle,
};
use crate::error::{IconError, Result};
use crate::imaging::{SourceImageMeta, validate_source_image};
use crate::output::{DEFAULT_OUTPUT_DIR, GenerationResult};
use crate::variants::{
    AndroidOptions, generate_android_icons, generate_favicon, generate_splash_icon,
    generate_standard_icon,
};

/// Background color that a bundle's own fill color may override.
pub const DEFAULT_BG_COLOR: &str = "#FFFFFF";

// ============================================================================
// Options
// ============================================================================

/// Which variants to produce. With no flag set, every variant is produced,
/// Android as its foreground layer alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariantFlags {
    pub android: bool,
    pub favicon: bool,
    pub splash: bool,
    pub icon: bool,
}

impl VariantFlags {
    /// Returns true if at least one variant was selected explicitly.
    pub fn any(&self) -> bool {
        self.android || self.favicon || self.splash || self.icon
    }

    /// The effective selection: the flags as given, or everything if none is set.
    pub fn resolved(self) -> Self {
        if self.any() {
            self
        } else {
            Self {
                android: true,
                favicon: true,
                splash: true,
                icon: true,
            }
        }
    }
}

/// Everything [`generate`] needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// A square PNG or a `.icon` bundle.
    pub input_path: PathBuf,
    /// Output directory, or a `.icon` path to author a bundle instead.
    pub output_dir: PathBuf,
    pub variants: VariantFlags,
    /// Android background color. Left at `#FFFFFF`, a bundle input's fill
    /// color is used instead.
    pub bg_color: String,
    /// Dark appearance fill; only used when authoring a bundle.
    pub dark_bg_color: Option<String>,
    /// Separate artwork for the splash icon (PNG or bundle).
    pub splash_input_path: Option<PathBuf>,
    pub banner: Option<BannerOptions>,
    /// Suppresses progress logging.
    pub silent: bool,
}

impl GeneratorOptions {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            variants: VariantFlags::default(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            dark_bg_color: None,
            splash_input_path: None,
            banner: None,
            silent: false,
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::new("", DEFAULT_OUTPUT_DIR)
    }
}

// ============================================================================
// Progress reporting
// ============================================================================

/// Progress lines routed through the `log` facade.
struct Reporter {
    silent: bool,
}

impl Reporter {
    fn banner(&self) {
        if !self.silent {
            log::info!("iconwolf {} - app icon generator", env!("CARGO_PKG_VERSION"));
        }
    }

    fn info(&self, message: impl fmt::Display) {
        if !self.silent {
            log::info!("{message}");
        }
    }

    fn generated(&self, result: &GenerationResult) {
        if !self.silent {
            log::info!(
                "generated {} ({}x{}, {:.1} KB)",
                result.file_path.display(),
                result.width,
                result.height,
                result.size_kb()
            );
        }
    }

    fn source(&self, label: &str, meta: &SourceImageMeta) {
        self.info(format_args!(
            "{label}: {}x{} {}",
            meta.width,
            meta.height,
            format!("{:?}", meta.format).to_uppercase()
        ));
    }

    fn summary(&self, results: &[GenerationResult]) {
        if self.silent {
            return;
        }
        let total_kb: f64 = results.iter().map(GenerationResult::size_kb).sum();
        let plural = if results.len() == 1 { "" } else { "s" };
        log::info!(
            "{} file{plural} generated ({total_kb:.1} KB total)",
            results.len()
        );
    }
}

// ============================================================================
// Input resolution
// ============================================================================

/// A usable PNG input, possibly flattened from a bundle.
struct ResolvedInput {
    input_path: PathBuf,
    /// Layers-only artwork, when the input was a bundle.
    foreground_path: Option<PathBuf>,
    bg_color: String,
    /// Keeps the flattened images alive until generation finishes.
    _bundle: Option<ComposedBundle>,
}

fn resolve_input(path: &Path, bg_color: &str, reporter: &Reporter) -> Result<ResolvedInput> {
    if !is_bundle(path) {
        return Ok(ResolvedInput {
            input_path: path.to_path_buf(),
            foreground_path: None,
            bg_color: bg_color.to_string(),
            _bundle: None,
        });
    }

    reporter.info(format_args!("Apple Icon Composer file: {}", path.display()));
    let bundle = read_bundle(path)?;

    let bg_color = if bg_color.eq_ignore_ascii_case(DEFAULT_BG_COLOR) {
        reporter.info(format_args!(
            "Extracted background color: {}",
            bundle.extracted_bg_color
        ));
        bundle.extracted_bg_color.clone()
    } else {
        bg_color.to_string()
    };

    Ok(ResolvedInput {
        input_path: bundle.composed_image_path.clone(),
        foreground_path: Some(bundle.foreground_image_path.clone()),
        bg_color,
        _bundle: Some(bundle),
    })
}

// ============================================================================
// Generation
// ============================================================================

/// Runs the whole pipeline and returns every file written, in the order
/// icon, android layers, favicon, splash.
///
/// Temporary images from bundle inputs are removed before this returns,
/// whether it succeeds or not.
pub fn generate(options: &GeneratorOptions) -> Result<Vec<GenerationResult>> {
    let reporter = Reporter {
        silent: options.silent,
    };
    reporter.banner();

    if !options.input_path.exists() {
        return Err(IconError::not_found(format!(
            "Source not found: {}",
            options.input_path.display()
        )));
    }
    let input = std::path::absolute(&options.input_path)?;
    let output_dir = std::path::absolute(&options.output_dir)?;

    if has_bundle_extension(&output_dir) {
        return author_bundle(&input, &output_dir, options, &reporter);
    }

    if options.dark_bg_color.is_some() {
        log::warn!("dark background color only applies when writing a .icon bundle; ignoring");
    }

    let main = resolve_input(&input, &options.bg_color, &reporter)?;

    let splash = match &options.splash_input_path {
        Some(path) => {
            if !path.exists() {
                return Err(IconError::not_found(format!(
                    "Splash source not found: {}",
                    path.display()
                )));
            }
            let path = std::path::absolute(path)?;
            Some(resolve_input(&path, &main.bg_color, &reporter)?)
        }
        None => None,
    };
    let splash_path = splash
        .as_ref()
        .map(|s| s.foreground_path.as_ref().unwrap_or(&s.input_path));

    reporter.info(format_args!(
        "Validating source image: {}",
        main.input_path.display()
    ));
    reporter.source("Source", &validate_source_image(&main.input_path)?);
    if let Some(path) = splash_path {
        reporter.info(format_args!("Validating splash source image: {}", path.display()));
        reporter.source("Splash source", &validate_source_image(path)?);
    }

    fs::create_dir_all(&output_dir)?;
    reporter.info(format_args!("Output directory: {}", output_dir.display()));

    let selected = options.variants.resolved();
    let mut results = Vec::new();

    if selected.icon {
        results.push(generate_standard_icon(&main.input_path, &output_dir)?);
    }
    if selected.android {
        // Background and monochrome layers only on an explicit request.
        let android = AndroidOptions {
            bg_color: main.bg_color.clone(),
            include_background: options.variants.android,
        };
        results.extend(generate_android_icons(&main.input_path, &output_dir, &android)?);
    }
    if selected.favicon {
        results.push(generate_favicon(&main.input_path, &output_dir)?);
    }
    if selected.splash {
        let source = splash_path
            .or(main.foreground_path.as_ref())
            .unwrap_or(&main.input_path);
        results.push(generate_splash_icon(source, &output_dir)?);
    }

    if let Some(banner) = &options.banner {
        for result in results.iter_mut() {
            if should_apply_banner(&result.file_path) {
                apply_banner(result, banner)?;
            }
        }
    }

    for result in &results {
        reporter.generated(result);
    }
    reporter.summary(&results);

    Ok(results)
}

/// Writes a `.icon` bundle from a PNG input instead of generating variants.
fn author_bundle(
    input: &Path,
    output: &Path,
    options: &GeneratorOptions,
    reporter: &Reporter,
) -> Result<Vec<GenerationResult>> {
    if is_bundle(input) {
        return Err(IconError::validation(format!(
            "Input is already an Icon Composer bundle: {}",
            input.display()
        )));
    }
    reporter.source("Source", &validate_source_image(input)?);

    let bundle_options = BundleOptions {
        bg_color: options.bg_color.clone(),
        dark_bg_color: options.dark_bg_color.clone(),
        banner: options.banner.clone(),
    };
    let result = write_bundle(input, output, &bundle_options)?;

    reporter.generated(&result);
    reporter.summary(std::slice::from_ref(&result));
    Ok(vec![result])
}
