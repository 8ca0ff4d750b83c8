//! CLI implementation for `raydeps link` command
//!
//! Prints cargo build-script directives for a fetched release.

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::output::{self, OutputConfig};
use crate::core::fetch::FetchOptions;
use crate::core::link::LinkConfig;
use crate::core::platform::detect_host_platform;
use crate::core::version::is_latest;

/// Execute the link command
pub fn execute(
    base_dir: &Path,
    raylib_version: Option<String>,
    plat_name: Option<String>,
) -> Result<()> {
    let settings = super::load_settings()?;
    let version = raylib_version.unwrap_or_else(|| settings.raylib_version().to_string());
    if is_latest(&version) {
        bail!("An explicit --raylib-version is required to locate a fetched release");
    }
    let platform = plat_name.unwrap_or_else(detect_host_platform);

    let options = FetchOptions {
        plat_name: platform.clone(),
        base_dir: base_dir.to_path_buf(),
        ..FetchOptions::default()
    };
    let layout = options.layout_for(version.trim());
    let config = LinkConfig::resolve(&layout, &platform)?;

    if OutputConfig::current().json {
        return output::print_json(&config);
    }

    // Directives go to stdout even in quiet mode so build scripts can pipe them
    for line in config.to_cargo_directives() {
        println!("{line}");
    }
    Ok(())
}
