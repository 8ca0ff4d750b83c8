//! Release hosting client
//!
//! Queries the GitHub REST API for raylib releases and their assets.

pub mod client;

use serde::{Deserialize, Serialize};

pub use client::ReleaseClient;

/// A published release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Git tag of the release (e.g. `5.0`)
    pub tag_name: String,
    /// API URL listing the release's assets
    pub assets_url: String,
    /// Human readable title
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the release is flagged as a prerelease
    #[serde(default)]
    pub prerelease: bool,
    /// Assets embedded in the release payload
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name (e.g. `raylib-5.0_linux_amd64.tar.gz`)
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// MIME type reported by the host
    #[serde(default)]
    pub content_type: Option<String>,
}
