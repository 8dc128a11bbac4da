//! Cached "new version available" check.
//!
//! The latest release version is cached in a small JSON file for a day. A run
//! reads the cache synchronously to decide whether to print a notice, and
//! refreshes it from a [`ReleaseSource`] when stale. Every failure in here is
//! swallowed: an update check must never break icon generation.
//!
//! # Cache Format
//!
//! ```json
//! { "latestVersion": "1.2.0", "checkedAt": 1718000000000 }
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// How long a cached check stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const CACHE_DIR: &str = ".iconwolf";
const CACHE_FILE: &str = "update-check.json";

/// Result of comparing the running version against the cached latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub update_available: bool,
    pub current_version: String,
    pub latest_version: String,
}

/// On-disk cache contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheData {
    pub latest_version: String,
    /// Milliseconds since the Unix epoch.
    pub checked_at: u64,
}

/// Somewhere the latest released version can be looked up.
pub trait ReleaseSource {
    type Error: std::fmt::Display;

    /// Returns the latest release tag (e.g. `v1.2.0`), or `None` if there is
    /// no release.
    fn latest_tag(&self) -> Result<Option<String>, Self::Error>;
}

/// `~/.iconwolf/update-check.json`, if a home directory is known.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CACHE_DIR).join(CACHE_FILE))
}

/// Compares dotted numeric versions; missing or non-numeric parts count as 0.
pub fn is_newer_version(current: &str, latest: &str) -> bool {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect()
    };
    let (current, latest) = (parse(current), parse(latest));

    for i in 0..current.len().max(latest.len()) {
        let c = current.get(i).copied().unwrap_or(0);
        let l = latest.get(i).copied().unwrap_or(0);
        match l.cmp(&c) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }
    false
}

/// Reads the cache and compares it against `current_version`.
///
/// Returns `None` if the cache is missing, unreadable, or empty.
pub fn read_cached_update_info(current_version: &str, cache_path: &Path) -> Option<UpdateInfo> {
    let raw = fs::read_to_string(cache_path).ok()?;
    let data: CacheData = serde_json::from_str(&raw).ok()?;
    if data.latest_version.is_empty() {
        return None;
    }

    Some(UpdateInfo {
        update_available: is_newer_version(current_version, &data.latest_version),
        current_version: current_version.to_string(),
        latest_version: data.latest_version,
    })
}

/// Returns true if the cache file was written within [`CACHE_TTL`].
pub fn is_cache_fresh(cache_path: &Path) -> bool {
    fs::metadata(cache_path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age < CACHE_TTL)
}

/// Refreshes a stale cache from `source`. Does nothing when the cache is fresh.
pub fn refresh_cache<S: ReleaseSource>(cache_path: &Path, source: &S) {
    if is_cache_fresh(cache_path) {
        return;
    }

    let tag = match source.latest_tag() {
        Ok(Some(tag)) => tag,
        Ok(None) => return,
        Err(e) => {
            log::debug!("update check failed: {e}");
            return;
        }
    };

    let data = CacheData {
        latest_version: tag.strip_prefix('v').unwrap_or(&tag).to_string(),
        checked_at: now_millis(),
    };
    if let Err(e) = write_cache(cache_path, &data) {
        log::debug!("could not write update cache {}: {e}", cache_path.display());
    }
}

fn write_cache(cache_path: &Path, data: &CacheData) -> std::io::Result<()> {
    if let Some(dir) = cache_path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(cache_path, serde_json::to_string(data)?)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedSource {
        tag: Result<Option<String>, String>,
        calls: Cell<usize>,
    }

    impl FixedSource {
        fn new(tag: Result<Option<&str>, &str>) -> Self {
            Self {
                tag: tag.map(|t| t.map(str::to_string)).map_err(str::to_string),
                calls: Cell::new(0),
            }
        }
    }

    impl ReleaseSource for FixedSource {
        type Error = String;

        fn latest_tag(&self) -> Result<Option<String>, String> {
            self.calls.set(self.calls.get() + 1);
            self.tag.clone()
        }
    }

    #[test]
    fn version_comparison() {
        assert!(is_newer_version("0.1.0", "0.2.0"));
        assert!(is_newer_version("0.1.0", "0.1.1"));
        assert!(is_newer_version("1.9.9", "2.0.0"));
        assert!(is_newer_version("1.0", "1.0.1"));
        assert!(!is_newer_version("0.2.0", "0.1.0"));
        assert!(!is_newer_version("1.0.0", "1.0.0"));
        assert!(!is_newer_version("1.0.0", "1.0"));
    }

    #[test]
    fn reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        fs::write(&path, r#"{"latestVersion":"9.0.0","checkedAt":0}"#).unwrap();

        let info = read_cached_update_info("0.1.0", &path).unwrap();
        assert!(info.update_available);
        assert_eq!(info.current_version, "0.1.0");
        assert_eq!(info.latest_version, "9.0.0");
    }

    #[test]
    fn missing_or_bad_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        assert!(read_cached_update_info("0.1.0", &path).is_none());

        fs::write(&path, "not json").unwrap();
        assert!(read_cached_update_info("0.1.0", &path).is_none());

        fs::write(&path, r#"{"latestVersion":"","checkedAt":0}"#).unwrap();
        assert!(read_cached_update_info("0.1.0", &path).is_none());
    }

    #[test]
    fn refresh_writes_stripped_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CACHE_FILE);
        let source = FixedSource::new(Ok(Some("v1.4.2")));

        refresh_cache(&path, &source);

        let data: CacheData = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(data.latest_version, "1.4.2");
        assert!(data.checked_at > 0);
        assert!(is_cache_fresh(&path));
    }

    #[test]
    fn fresh_cache_skips_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        fs::write(&path, r#"{"latestVersion":"1.0.0","checkedAt":0}"#).unwrap();
        let source = FixedSource::new(Ok(Some("v2.0.0")));

        refresh_cache(&path, &source);

        assert_eq!(source.calls.get(), 0);
        assert_eq!(read_cached_update_info("1.0.0", &path).unwrap().latest_version, "1.0.0");
    }

    #[test]
    fn source_errors_are_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);

        refresh_cache(&path, &FixedSource::new(Err("offline")));
        refresh_cache(&path, &FixedSource::new(Ok(None)));

        assert!(!path.exists());
    }

    #[test]
    fn cache_uses_camel_case_keys() {
        let json = serde_json::to_string(&CacheData {
            latest_version: "1.0.0".into(),
            checked_at: 5,
        })
        .unwrap();
        assert_eq!(json, r#"{"latestVersion":"1.0.0","checkedAt":5}"#);
    }
}
