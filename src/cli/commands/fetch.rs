//! CLI implementation for `raydeps fetch` command
//!
//! This module handles the CLI interface for downloading raylib.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{self, status, OutputConfig};
use crate::config::defaults;
use crate::core::fetch::{fetch_dependencies, FetchOptions, FetchOutcome};
use crate::core::settings::Settings;
use crate::infra::download::{DownloadManager, ProgressCallback};

/// Arguments of the fetch command
#[derive(Debug, Clone, Default)]
pub struct FetchArgs {
    pub repo: Option<String>,
    pub raylib_version: Option<String>,
    pub plat_name: Option<String>,
    pub no_semver: bool,
    pub base_dir: PathBuf,
    pub force: bool,
    pub sha256: Option<String>,
}

/// Machine readable fetch summary
#[derive(Debug, Serialize)]
struct FetchReport<'a> {
    status: &'a str,
    version: &'a str,
    platform: &'a str,
    directory: String,
    asset: Option<&'a str>,
    checksum: Option<&'a str>,
    size: Option<u64>,
    files: Option<usize>,
}

/// Merge command-line flags over settings
pub fn build_options(args: FetchArgs, settings: &Settings) -> FetchOptions {
    let mut options = FetchOptions::from_settings(settings, args.base_dir);
    if let Some(repo) = args.repo {
        options.repo = repo;
    }
    if let Some(version) = args.raylib_version {
        options.raylib_version = version;
    }
    if let Some(plat_name) = args.plat_name {
        options.plat_name = plat_name;
    }
    options.no_semver |= args.no_semver;
    options.force = args.force;
    options.sha256 = args.sha256;
    options
}

/// Execute the fetch command
pub async fn execute(args: FetchArgs) -> Result<()> {
    let settings = super::load_settings()?;
    let options = build_options(args, &settings);
    let client = super::release_client(&settings);
    let downloads = DownloadManager::with_config(settings.retries(), defaults::RETRY_BASE_DELAY_MS);

    tracing::info!(
        "Fetching raylib '{}' from '{}' for '{}'",
        options.raylib_version,
        options.repo,
        options.plat_name
    );
    tracing::debug!("Up to {} download attempt(s)", downloads.attempts());

    let bar = output::create_download_bar(0);
    let progress: ProgressCallback = {
        let bar = bar.clone();
        Box::new(move |downloaded, total| {
            if total > 0 {
                bar.set_length(total);
            }
            bar.set_position(downloaded);
        })
    };

    let outcome = fetch_dependencies(&client, &downloads, &options, Some(progress))
        .await
        .with_context(|| format!("Failed to fetch raylib from '{}'", options.repo));
    bar.finish_and_clear();
    let outcome = outcome?;

    if OutputConfig::current().json {
        return output::print_json(&report(&outcome, &options.plat_name));
    }

    match &outcome {
        FetchOutcome::AlreadyPresent { version, layout } => {
            output::message(&format!(
                "{} raylib {version} already present in {}",
                status::INFO,
                layout.root().display()
            ));
        }
        FetchOutcome::Fetched {
            version,
            layout,
            asset,
            files,
            ..
        } => {
            output::message(&format!(
                "{} Fetched {} (raylib {version}, {files} file(s)) into {}",
                status::SUCCESS,
                asset.name,
                layout.root().display()
            ));
        }
    }

    Ok(())
}

fn report<'a>(outcome: &'a FetchOutcome, platform: &'a str) -> FetchReport<'a> {
    let directory = outcome.layout().root().display().to_string();
    match outcome {
        FetchOutcome::AlreadyPresent { version, .. } => FetchReport {
            status: "present",
            version,
            platform,
            directory,
            asset: None,
            checksum: None,
            size: None,
            files: None,
        },
        FetchOutcome::Fetched {
            version,
            asset,
            checksum,
            size,
            files,
            ..
        } => FetchReport {
            status: "fetched",
            version,
            platform,
            directory,
            asset: Some(asset.name.as_str()),
            checksum: Some(checksum.as_str()),
            size: Some(*size),
            files: Some(*files),
        },
    }
}
