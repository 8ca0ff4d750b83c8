//! Platform name resolution and release asset selection
//!
//! raylib publishes one archive per platform, named like
//! `raylib-5.0_linux_amd64.tar.gz` or `raylib-5.0_win64_msvc16.zip`.
//! This module produces the platform part of those names for the running
//! host and turns a platform name into the regex used to pick an asset.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::releases::Asset;

/// Errors related to platform handling
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The platform pattern is not a valid regex
    #[error("Invalid platform pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },
}

/// Build a raylib-releases-like platform name
///
/// `os` accepts both Rust (`linux`, `macos`, `windows`) and Python
/// `sys.platform` spellings (`linux2`, `darwin`, `win32`).
///
/// * Linux: `linux_<arch>`, arch defaulting to `amd64` / `i386` by bitness
/// * macOS: always `macos`
/// * Windows: `win64_<arch>` or `win32_<arch>`, arch defaulting to
///   `mingw-w64` for GNU toolchains and `msvc16` otherwise
/// * anything else: `<os>` with an optional `_<arch>` suffix
pub fn platform_name(os: &str, arch: Option<&str>, bits64: bool, mingw: bool) -> String {
    let os = os.to_lowercase();

    if os == "darwin" || os == "macos" {
        return "macos".to_string();
    }

    let (plat, arch) = if os.contains("linux") {
        let default = if bits64 { "amd64" } else { "i386" };
        ("linux".to_string(), Some(arch.unwrap_or(default)))
    } else if os == "win32" || os == "windows" {
        let default = if mingw { "mingw-w64" } else { "msvc16" };
        let plat = if bits64 { "win64" } else { "win32" };
        (plat.to_string(), Some(arch.unwrap_or(default)))
    } else {
        (os, arch)
    };

    match arch {
        Some(arch) if !arch.is_empty() => format!("{plat}_{arch}"),
        _ => plat,
    }
}

/// Detect the platform name of the running host
pub fn detect_host_platform() -> String {
    let bits64 = cfg!(target_pointer_width = "64");
    let mingw = cfg!(all(target_os = "windows", target_env = "gnu"));
    platform_name(std::env::consts::OS, None, bits64, mingw)
}

/// Regex source for a platform name
///
/// The host's own platform name is loosened so that `_` also matches `-` and
/// `16` also matches `15` (older releases shipped `msvc15` builds). Any other
/// name is taken to be a user supplied regex and used verbatim.
pub fn pattern_source(plat_name: &str, host_plat: &str) -> String {
    if plat_name == host_plat {
        regex::escape(plat_name)
            .replace('_', "(_|-)")
            .replace("16", "(16|15)")
    } else {
        plat_name.to_string()
    }
}

/// Compile the case-insensitive asset pattern for a platform name
pub fn asset_pattern(plat_name: &str, host_plat: &str) -> Result<Regex, PlatformError> {
    let source = pattern_source(plat_name, host_plat);
    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| PlatformError::InvalidPattern {
            pattern: source.clone(),
            error: e.to_string(),
        })
}

/// Pick the first asset whose name matches the pattern
pub fn select_asset<'a>(assets: &'a [Asset], pattern: &Regex) -> Option<&'a Asset> {
    assets.iter().find(|asset| pattern.is_match(&asset.name))
}

/// Whether a platform name denotes a Windows toolchain
pub fn is_windows_like(plat_name: &str) -> bool {
    plat_name.contains("win") || plat_name.contains("mingw")
}
