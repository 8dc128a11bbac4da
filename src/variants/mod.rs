//! Per-platform icon variants generated from one square source image.
//!
//! Each generator reads its input from disk, writes a fixed file name into
//! the output directory (see [`crate::output::files`]), and returns the
//! [`GenerationResult`](crate::output::GenerationResult) for what it wrote.
//!
//! | Generator | File(s) | Size |
//! |---|---|---|
//! | [`generate_standard_icon`] | `icon.png` | 1024 |
//! | [`generate_favicon`] | `favicon.png` | 48, rounded corners |
//! | [`generate_splash_icon`] | `splash-icon.png` | 1024 |
//! | [`generate_android_icons`] | `adaptive-icon.png`, `android-icon-background.png`, `monochrome-icon.png` | 1024 |

pub mod android;
pub mod favicon;
pub mod splash;
pub mod standard;

pub use android::{ANDROID_ICON_SIZE, AndroidOptions, SAFE_ZONE_SIZE, generate_android_icons};
pub use favicon::{FAVICON_SIZE, generate_favicon};
pub use splash::{SPLASH_ICON_SIZE, generate_splash_icon};
pub use standard::{STANDARD_ICON_SIZE, generate_standard_icon};
