//! Platform-specific directory management
//!
//! Resolves where the raydeps settings file lives. Follows the XDG Base
//! Directory Specification on Linux and standard locations on macOS and
//! Windows.
//!
//! `RAYDEPS_CONFIG_DIR` overrides the default location.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "RAYDEPS_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "raydeps";

/// Settings file name
const SETTINGS_FILE: &str = "config.toml";

/// Platform-specific directory provider for raydeps
#[derive(Debug, Clone)]
pub struct RaydepsDirs {
    config_dir: PathBuf,
}

impl RaydepsDirs {
    /// Create a new `RaydepsDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Create an instance rooted at an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/raydeps` or `~/.config/raydeps`
    /// - macOS: `~/Library/Application Support/raydeps`
    /// - Windows: `%APPDATA%\raydeps`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the settings file path
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for RaydepsDirs {
    fn default() -> Self {
        Self::new()
    }
}
