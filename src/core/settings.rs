//! User settings
//!
//! Reads optional defaults from `config.toml` in the config directory.
//! Command-line flags win over environment variables, which win over the
//! file, which wins over built-in defaults.
//!
//! ```toml
//! [github]
//! api_url = "https://api.github.com"
//! repo = "raysan5/raylib"
//! token = "ghp_..."
//!
//! [fetch]
//! raylib_version = "5.5"
//! no_semver = false
//! retries = 3
//! ```

use crate::config::{defaults, urls};
use crate::infra::dirs::RaydepsDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding the API base URL
pub const ENV_GITHUB_API: &str = "RAYDEPS_GITHUB_API";

/// Environment variable holding an API token
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// raydeps settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Release hosting settings
    #[serde(default)]
    pub github: GithubSettings,

    /// Fetch defaults
    #[serde(default)]
    pub fetch: FetchSettings,
}

/// Release hosting settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubSettings {
    /// API base URL
    pub api_url: Option<String>,

    /// Repository as `owner/name`
    pub repo: Option<String>,

    /// API token
    pub token: Option<String>,
}

/// Fetch defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSettings {
    /// raylib version (empty string for latest)
    pub raylib_version: Option<String>,

    /// Disable zero-padded tag lookups
    pub no_semver: Option<bool>,

    /// Download retry attempts
    pub retries: Option<u32>,
}

impl Settings {
    /// Load settings from the config directory
    ///
    /// A missing file yields defaults; an unreadable or invalid one is an error.
    pub fn load(dirs: &RaydepsDirs) -> Result<Self, SettingsError> {
        Self::load_from_path(&dirs.settings_path())
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(ENV_GITHUB_API).filter(|v| !v.is_empty()) {
            self.github.api_url = Some(api_url);
        }
        if let Some(token) = lookup(ENV_GITHUB_TOKEN).filter(|v| !v.is_empty()) {
            self.github.token = Some(token);
        }
        self
    }

    /// Effective API base URL
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(urls::GITHUB_API)
    }

    /// Effective repository
    #[must_use]
    pub fn repo(&self) -> &str {
        self.github.repo.as_deref().unwrap_or(defaults::DEFAULT_REPO)
    }

    /// API token, if any
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.github.token.as_deref()
    }

    /// Effective raylib version
    #[must_use]
    pub fn raylib_version(&self) -> &str {
        self.fetch
            .raylib_version
            .as_deref()
            .unwrap_or(defaults::DEFAULT_RAYLIB_VERSION)
    }

    /// Whether zero-padded tag lookups are disabled
    #[must_use]
    pub fn no_semver(&self) -> bool {
        self.fetch.no_semver.unwrap_or(false)
    }

    /// Effective download retry attempts
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.fetch
            .retries
            .unwrap_or(defaults::MAX_DOWNLOAD_RETRIES)
            .max(1)
    }
}
