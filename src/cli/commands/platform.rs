//! CLI implementation for `raydeps platform` command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{self, status, OutputConfig};
use crate::core::platform::{detect_host_platform, is_windows_like, pattern_source};

#[derive(Debug, Serialize)]
struct PlatformReport {
    platform: String,
    pattern: String,
    windows: bool,
}

fn report() -> PlatformReport {
    let platform = detect_host_platform();
    PlatformReport {
        pattern: pattern_source(&platform, &platform),
        windows: is_windows_like(&platform),
        platform,
    }
}

/// Execute the platform command
pub fn execute() -> Result<()> {
    let report = report();

    if OutputConfig::current().json {
        return output::print_json(&report);
    }

    output::message(&format!("{} Platform: {}", status::INFO, report.platform));
    output::message(&format!("  Asset pattern: {}", report.pattern));
    Ok(())
}
