//! CLI implementation for `raydeps assets` command
//!
//! Lists the assets of a release and marks the one `fetch` would pick.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{self, status, OutputConfig};
use crate::core::fetch::{available_versions, resolve_release};
use crate::core::platform::{asset_pattern, detect_host_platform};
use crate::releases::{Asset, ReleaseClient};

#[derive(Debug, Serialize)]
struct AssetEntry<'a> {
    name: &'a str,
    size: u64,
    url: &'a str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct AssetsReport<'a> {
    tag: &'a str,
    platform: &'a str,
    assets: Vec<AssetEntry<'a>>,
}

fn entries<'a>(assets: &'a [Asset], selected: Option<&Asset>) -> Vec<AssetEntry<'a>> {
    assets
        .iter()
        .map(|a| AssetEntry {
            name: &a.name,
            size: a.size,
            url: &a.browser_download_url,
            selected: selected.is_some_and(|s| s.name == a.name),
        })
        .collect()
}

/// Execute the assets command
pub async fn execute(
    repo: Option<String>,
    raylib_version: Option<String>,
    plat_name: Option<String>,
    no_semver: bool,
) -> Result<()> {
    let settings = super::load_settings()?;
    let client = super::release_client(&settings);

    let repo = repo.unwrap_or_else(|| settings.repo().to_string());
    let version = raylib_version.unwrap_or_else(|| settings.raylib_version().to_string());
    let host = detect_host_platform();
    let plat_name = plat_name.unwrap_or_else(|| host.clone());
    let semver = !(no_semver || settings.no_semver());

    let pattern = asset_pattern(&plat_name, &host)?;

    let spinner = output::create_spinner(&format!("Looking up raylib '{version}' in {repo}..."));
    let release = resolve_release(&client, &repo, &version, semver).await;
    spinner.finish_and_clear();
    let release = match release {
        Ok(release) => release,
        Err(e) => {
            if e.is_not_found() {
                suggest_versions(&client, &repo).await;
            }
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to look up raylib '{version}' in '{repo}'")));
        }
    };

    let selected = crate::core::platform::select_asset(&release.assets, &pattern);
    let entries = entries(&release.assets, selected);

    if OutputConfig::current().json {
        return output::print_json(&AssetsReport {
            tag: &release.tag,
            platform: &plat_name,
            assets: entries,
        });
    }

    output::message(&format!(
        "{} Release {} ({} asset(s))",
        status::INFO,
        release.tag,
        entries.len()
    ));
    for entry in &entries {
        let marker = if entry.selected { status::SUCCESS } else { " " };
        output::message(&format!("  {marker} {} ({} bytes)", entry.name, entry.size));
    }
    if selected.is_none() {
        output::message(&format!(
            "{} No asset matches '{plat_name}'",
            status::WARNING
        ));
    }

    Ok(())
}

/// List the tags that do exist after a lookup missed
async fn suggest_versions(client: &ReleaseClient, repo: &str) {
    match available_versions(client, repo).await {
        Ok(tags) if !tags.is_empty() => {
            output::message(&format!(
                "{} Available releases: {}",
                status::INFO,
                tags.join(", ")
            ));
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("Could not list releases: {e}"),
    }
}
