//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod assets;
pub mod clean;
pub mod fetch;
pub mod link;
pub mod platform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::core::settings::Settings;
use crate::infra::dirs::RaydepsDirs;
use crate::releases::ReleaseClient;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download build dependencies (includes, libs, etc...)
    #[command(alias = "download-deps")]
    Fetch {
        /// GitHub repository as '<owner>/<name>' [default: raysan5/raylib]
        #[arg(short, long)]
        repo: Option<String>,

        /// raylib version to download; an empty string selects the latest release [default: 5.0]
        #[arg(long)]
        raylib_version: Option<String>,

        /// Platform name regex to download for [default: detected platform]
        #[arg(short, long)]
        plat_name: Option<String>,

        /// Don't retry the version formatted as X.0.0 or X.Y.0
        #[arg(short, long)]
        no_semver: bool,

        /// Directory the build/ tree is created in
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,

        /// Re-download even if the output directory exists
        #[arg(short, long)]
        force: bool,

        /// Expected SHA-256 of the release archive
        #[arg(long)]
        sha256: Option<String>,
    },

    /// Show the detected platform name and asset pattern
    Platform,

    /// List the assets of a raylib release
    Assets {
        /// GitHub repository as '<owner>/<name>'
        #[arg(short, long)]
        repo: Option<String>,

        /// raylib version; an empty string selects the latest release
        #[arg(long)]
        raylib_version: Option<String>,

        /// Platform name regex used to mark the selected asset
        #[arg(short, long)]
        plat_name: Option<String>,

        /// Don't retry the version formatted as X.0.0 or X.Y.0
        #[arg(short, long)]
        no_semver: bool,
    },

    /// Print linker configuration for a fetched release
    Link {
        /// raylib version that was fetched
        #[arg(long)]
        raylib_version: Option<String>,

        /// Platform name that was fetched
        #[arg(short, long)]
        plat_name: Option<String>,

        /// Directory containing the build/ tree
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,
    },

    /// Remove fetched dependencies
    Clean {
        /// Directory containing the build/ tree
        #[arg(short, long, default_value = ".")]
        base_dir: PathBuf,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Fetch {
                repo,
                raylib_version,
                plat_name,
                no_semver,
                base_dir,
                force,
                sha256,
            } => {
                let args = fetch::FetchArgs {
                    repo,
                    raylib_version,
                    plat_name,
                    no_semver,
                    base_dir,
                    force,
                    sha256,
                };
                fetch::execute(args).await
            }
            Self::Platform => platform::execute(),
            Self::Assets {
                repo,
                raylib_version,
                plat_name,
                no_semver,
            } => assets::execute(repo, raylib_version, plat_name, no_semver).await,
            Self::Link {
                raylib_version,
                plat_name,
                base_dir,
            } => link::execute(&base_dir, raylib_version, plat_name),
            Self::Clean { base_dir } => clean::execute(&base_dir),
        }
    }
}

/// Load user settings with environment overrides applied
pub(crate) fn load_settings() -> Result<Settings> {
    let dirs = RaydepsDirs::new();
    let settings = Settings::load(&dirs).with_context(|| "Failed to load settings")?;
    Ok(settings.with_env_overrides())
}

/// Release client configured from settings
pub(crate) fn release_client(settings: &Settings) -> ReleaseClient {
    tracing::debug!("Using release API at {}", settings.api_url());
    ReleaseClient::with_api_url(settings.api_url(), settings.token())
}
