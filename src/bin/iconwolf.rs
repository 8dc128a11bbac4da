//! Command-line front end.
//!
//! ```text
//! iconwolf AppIcon.icon                       # every variant into ./assets/images
//! iconwolf icon.png --favicon -o public       # just the favicon
//! iconwolf icon.png -o ios/AppIcon.icon       # author an Icon Composer bundle
//! iconwolf icon.png --banner BETA             # ribbon across the top-left corner
//! ```

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde::Deserialize;

use iconwolf::output::default_output_dir;
use iconwolf::update_check::{self, ReleaseSource};
use iconwolf::{BannerOptions, BannerPosition, GeneratorOptions, VariantFlags, generate};

const RELEASES_URL: &str = "https://api.github.com/repos/MrDemonWolf/iconwolf/releases/latest";
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "iconwolf", version)]
#[command(
    about = "Generate all necessary icon variants for cross-platform Expo/React Native projects from a single source icon"
)]
struct Cli {
    /// Path to an Apple Icon Composer .icon folder or a source PNG
    input: PathBuf,

    /// Output directory, or a path ending in .icon to create an Icon Composer bundle
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generate Android adaptive icon variants only
    #[arg(long)]
    android: bool,

    /// Generate web favicon only
    #[arg(long)]
    favicon: bool,

    /// Generate splash screen icon only
    #[arg(long)]
    splash: bool,

    /// Generate standard icon.png only
    #[arg(long)]
    icon: bool,

    /// Use a separate image (PNG or .icon) for the splash screen icon
    #[arg(long, value_name = "PATH")]
    splash_input: Option<PathBuf>,

    /// Background color for the Android adaptive icon and authored bundles
    #[arg(long, value_name = "HEX", default_value = "#FFFFFF")]
    bg_color: String,

    /// Dark appearance background for authored bundles
    #[arg(long, value_name = "HEX")]
    dark_bg_color: Option<String>,

    /// Diagonal ribbon banner text (e.g. DEV, BETA, STAGING)
    #[arg(long, value_name = "TEXT")]
    banner: Option<String>,

    /// Ribbon color (default: derived from the banner text)
    #[arg(long, value_name = "HEX", requires = "banner")]
    banner_color: Option<String>,

    /// Corner the ribbon is drawn across
    #[arg(long, value_enum, default_value_t = BannerPosition::TopLeft)]
    banner_position: BannerPosition,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Skip checking for a newer release
    #[arg(long)]
    no_update_check: bool,
}

impl Cli {
    fn generator_options(&self) -> Result<GeneratorOptions> {
        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => {
                let cwd = std::env::current_dir().context("cannot determine working directory")?;
                PathBuf::from(default_output_dir(&cwd))
            }
        };

        let banner = self.banner.as_ref().map(|text| BannerOptions {
            text: text.clone(),
            color: self.banner_color.clone(),
            position: self.banner_position,
        });

        Ok(GeneratorOptions {
            variants: VariantFlags {
                android: self.android,
                favicon: self.favicon,
                splash: self.splash,
                icon: self.icon,
            },
            bg_color: self.bg_color.clone(),
            dark_bg_color: self.dark_bg_color.clone(),
            splash_input_path: self.splash_input.clone(),
            banner,
            silent: self.quiet,
            ..GeneratorOptions::new(&self.input, output_dir)
        })
    }
}

// ============================================================================
// Release lookup
// ============================================================================

#[derive(Deserialize)]
struct Release {
    tag_name: Option<String>,
}

/// Latest release of the project on GitHub.
struct GithubReleases {
    agent: ureq::Agent,
}

impl GithubReleases {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build()
            .into();
        Self { agent }
    }
}

impl ReleaseSource for GithubReleases {
    type Error = ureq::Error;

    fn latest_tag(&self) -> Result<Option<String>, ureq::Error> {
        let release: Release = self
            .agent
            .get(RELEASES_URL)
            .header("Accept", "application/vnd.github.v3+json")
            .call()?
            .body_mut()
            .read_json()?;
        Ok(release.tag_name)
    }
}

// ============================================================================
// Entry point
// ============================================================================

fn run(cli: &Cli) -> Result<()> {
    let cache_path = if cli.no_update_check {
        None
    } else {
        update_check::default_cache_path()
    };

    let current = env!("CARGO_PKG_VERSION");
    let update = cache_path
        .as_deref()
        .and_then(|path| update_check::read_cached_update_info(current, path));
    let refresh = cache_path.map(|path| {
        thread::spawn(move || update_check::refresh_cache(&path, &GithubReleases::new()))
    });

    let options = cli.generator_options()?;
    generate(&options).with_context(|| format!("failed to process {}", cli.input.display()))?;

    if let Some(info) = update.filter(|u| u.update_available) {
        info!(
            "Update available: {} -> {}. Run `brew upgrade iconwolf` to update.",
            info.current_version, info.latest_version
        );
    }

    if let Some(handle) = refresh {
        // The lookup is bounded by FETCH_TIMEOUT.
        let _ = handle.join();
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        process::exit(1);
    }
}
