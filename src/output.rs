//! Generated file records and the fixed output file layout.

use std::path::{Path, PathBuf};

/// A file written by a generator, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Where the file (or `.icon` folder) was written.
    pub file_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size on disk in bytes. For bundles, the sum of the files written.
    pub size: u64,
}

impl GenerationResult {
    /// Size in kilobytes, as shown in progress output.
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// Well-known output file names, relative to the output directory.
pub mod files {
    pub const ICON: &str = "icon.png";
    pub const ANDROID_FOREGROUND: &str = "adaptive-icon.png";
    pub const ANDROID_BACKGROUND: &str = "android-icon-background.png";
    pub const ANDROID_MONOCHROME: &str = "monochrome-icon.png";
    pub const FAVICON: &str = "favicon.png";
    pub const SPLASH_ICON: &str = "splash-icon.png";

    /// Every file produced when no variant is selected explicitly.
    pub const ALL: [&str; 6] = [
        ICON,
        ANDROID_FOREGROUND,
        ANDROID_BACKGROUND,
        ANDROID_MONOCHROME,
        FAVICON,
        SPLASH_ICON,
    ];
}

/// Output directory used when no `src/` directory exists.
pub const DEFAULT_OUTPUT_DIR: &str = "./assets/images";

/// Output directory used inside projects with a `src/` directory.
pub const SRC_OUTPUT_DIR: &str = "./src/assets/images";

/// Picks the default output directory relative to `project_root`.
///
/// Projects with a `src/` directory (common for Expo / React Native apps)
/// keep assets under `src/assets/images`.
pub fn default_output_dir(project_root: &Path) -> &'static str {
    if project_root.join("src").is_dir() {
        SRC_OUTPUT_DIR
    } else {
        DEFAULT_OUTPUT_DIR
    }
}

/// Joins a fixed file name onto the output directory.
pub fn resolve_output_path(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dir_prefers_src_when_present() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(default_output_dir(dir.path()), DEFAULT_OUTPUT_DIR);

        std::fs::create_dir(dir.path().join("src")).unwrap();
        assert_eq!(default_output_dir(dir.path()), SRC_OUTPUT_DIR);
    }

    #[test]
    fn src_file_does_not_count_as_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("src"), "").unwrap();
        assert_eq!(default_output_dir(dir.path()), DEFAULT_OUTPUT_DIR);
    }

    #[test]
    fn resolves_inside_output_dir() {
        let path = resolve_output_path(Path::new("/out"), files::FAVICON);
        assert_eq!(path, PathBuf::from("/out/favicon.png"));
    }

    #[test]
    fn size_in_kilobytes() {
        let result = GenerationResult {
            file_path: PathBuf::from("x.png"),
            width: 1,
            height: 1,
            size: 2048,
        };
        assert_eq!(result.size_kb(), 2.0);
    }
}
