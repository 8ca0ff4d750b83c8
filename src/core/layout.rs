//! On-disk layout of fetched dependencies
//!
//! A fetched release lives in `<base>/build/deps.<platform>/raylib-<version>/`
//! with the usual `include/` and `lib/` children.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::version::normalize_tag;

/// Name of the static library shipped in non-Windows archives
pub const STATIC_LIB_NAME: &str = "libraylib.a";

/// Directory holding a fetched raylib release
pub fn raylib_dir(base: &Path, platform: &str, version: &str) -> PathBuf {
    deps_dir(base, platform).join(format!("raylib-{}", normalize_tag(version)))
}

/// Per-platform parent directory of fetched releases
pub fn deps_dir(base: &Path, platform: &str) -> PathBuf {
    base.join(defaults::BUILD_DIR).join(format!("deps.{platform}"))
}

/// Paths inside a fetched raylib release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepsLayout {
    root: PathBuf,
}

impl DepsLayout {
    /// Layout for a platform and version under `base`
    pub fn new(base: &Path, platform: &str, version: &str) -> Self {
        Self {
            root: raylib_dir(base, platform, version),
        }
    }

    /// Layout rooted at an explicit directory
    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Release root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Header directory
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Library directory
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Static raylib archive
    pub fn static_lib(&self) -> PathBuf {
        self.lib_dir().join(STATIC_LIB_NAME)
    }

    /// Whether the release directory exists
    pub fn is_populated(&self) -> bool {
        self.root.is_dir()
    }
}

/// List `build/deps.*` directories under `base`
pub fn list_deps_dirs(base: &Path) -> Vec<PathBuf> {
    let build = base.join(defaults::BUILD_DIR);
    let Ok(entries) = std::fs::read_dir(&build) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| e.file_name().to_string_lossy().starts_with("deps."))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}
