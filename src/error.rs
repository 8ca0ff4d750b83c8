//! Error types for raydeps
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::fetch::FetchError;
use crate::core::link::LinkError;
use crate::core::platform::PlatformError;
use crate::core::settings::SettingsError;

/// Release API errors
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("fetch error: {url}: {error}")]
    Network { url: String, error: String },

    /// Release or asset list does not exist
    #[error("fetch error: {url}: not found")]
    NotFound { url: String },

    /// Server answered with a non-success status
    #[error("fetch error: {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Body was not the JSON we expected
    #[error("fetch error: {url}: invalid response: {error}")]
    InvalidResponse { url: String, error: String },

    /// Repository identifier is not `owner/name`
    #[error("Invalid repository '{repo}': expected '<owner>/<name>'")]
    InvalidRepository { repo: String },
}

impl ReleaseError {
    /// URL of the failing request, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Network { url, .. }
            | Self::NotFound { url }
            | Self::Status { url, .. }
            | Self::InvalidResponse { url, .. } => Some(url),
            Self::InvalidRepository { .. } => None,
        }
    }

    /// Whether the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Asset download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure
    #[error("fetch error: {url}: {error}")]
    NetworkError { url: String, error: String },

    /// Server answered with a non-success status
    #[error("fetch error: {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// Downloaded archive does not hash to the pinned value
    #[error("Checksum mismatch for '{asset}': expected {expected}, got {actual}")]
    ChecksumFailed {
        asset: String,
        expected: String,
        actual: String,
    },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

impl DownloadError {
    /// Whether another attempt could succeed
    ///
    /// Client errors other than timeouts and rate limiting are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::Status { status, .. } => {
                !(400..500).contains(status) || matches!(*status, 408 | 429)
            }
            Self::ChecksumFailed { .. } | Self::IoError { .. } => false,
        }
    }
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// File is not a readable zip archive
    #[error("{path} is not a zip file")]
    NotAZip { path: PathBuf },

    /// File is not a readable tar archive (compressed or not)
    #[error("{path} is not a compressed or uncompressed tar file")]
    NotATar { path: PathBuf },

    /// IO error while writing an entry
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file or directory
    #[error("Failed to read '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to move an entry
    #[error("Failed to move '{from}' to '{to}': {error}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },
}

/// Top-level raydeps error type
#[derive(Error, Debug)]
pub enum RaydepsError {
    /// Platform error
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Release API error
    #[error("{0}")]
    Release(#[from] ReleaseError),

    /// Download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Fetch error
    #[error("{0}")]
    Fetch(#[from] FetchError),

    /// Link error
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}
