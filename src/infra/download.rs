//! Release asset downloads
//!
//! Streams an asset to disk while hashing it, retries transient failures
//! with a doubling delay and checks a pinned SHA-256 when one is given.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::defaults;
use crate::error::DownloadError;
use crate::releases::Asset;

/// Progress callback receiving (`bytes_downloaded`, `total_bytes`)
///
/// `total_bytes` is 0 when neither the server nor the release listing
/// reported a size.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// An asset written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArchive {
    /// Bytes written
    pub size: u64,
    /// SHA-256 of the archive as lowercase hex
    pub checksum: String,
}

/// Fetches release assets with retry support
#[derive(Debug, Clone)]
pub struct DownloadManager {
    client: reqwest::Client,
    attempts: u32,
    base_delay: Duration,
}

impl DownloadManager {
    /// Create a download manager with the default retry policy
    pub fn new() -> Self {
        Self::with_config(defaults::MAX_DOWNLOAD_RETRIES, defaults::RETRY_BASE_DELAY_MS)
    }

    /// Create a download manager making up to `attempts` tries per asset
    pub fn with_config(attempts: u32, base_delay_ms: u64) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(defaults::USER_AGENT));

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS))
                .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            attempts: attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Attempts made per asset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Download `asset` to `dest`
    ///
    /// With `expected_sha256` set, a mismatching archive is an error. `dest`
    /// never survives a failed download.
    pub async fn fetch_asset(
        &self,
        asset: &Asset,
        dest: &Path,
        expected_sha256: Option<&str>,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadedArchive, DownloadError> {
        let result = self
            .fetch_with_retry(asset, dest, progress.as_ref())
            .await
            .and_then(|archive| match expected_sha256 {
                Some(expected) if !checksum_matches(&archive.checksum, expected) => {
                    Err(DownloadError::ChecksumFailed {
                        asset: asset.name.clone(),
                        expected: expected.trim().to_lowercase(),
                        actual: archive.checksum,
                    })
                }
                _ => Ok(archive),
            });

        if result.is_err() && tokio::fs::remove_file(dest).await.is_ok() {
            tracing::debug!("Removed incomplete download {}", dest.display());
        }
        result
    }

    async fn fetch_with_retry(
        &self,
        asset: &Asset,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadedArchive, DownloadError> {
        let mut attempt = 1;
        let mut delay = self.base_delay;

        loop {
            match self.stream_to_file(asset, dest, progress).await {
                Ok(archive) => return Ok(archive),
                Err(e) if attempt < self.attempts && e.is_retryable() => {
                    tracing::warn!(
                        "Download of '{}' failed (attempt {attempt}/{}): {e}",
                        asset.name,
                        self.attempts
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_millis(defaults::RETRY_MAX_DELAY_MS));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn stream_to_file(
        &self,
        asset: &Asset,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> Result<DownloadedArchive, DownloadError> {
        let url = asset.browser_download_url.as_str();
        let network_error = |e: reqwest::Error| DownloadError::NetworkError {
            url: url.to_string(),
            error: e.to_string(),
        };
        let io_error = |e: std::io::Error| DownloadError::IoError {
            path: dest.to_path_buf(),
            error: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total = expected_total(response.content_length(), asset.size);
        let mut file = File::create(dest).await.map_err(io_error)?;
        let mut hasher = Sha256::new();
        let mut size = 0u64;
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network_error)?;
            file.write_all(&chunk).await.map_err(io_error)?;
            hasher.update(&chunk);
            size += chunk.len() as u64;

            if let Some(report) = progress {
                report(size, total.max(size));
            }
        }
        file.flush().await.map_err(io_error)?;

        Ok(DownloadedArchive {
            size,
            checksum: hex::encode(hasher.finalize()),
        })
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Total size for progress reporting
///
/// GitHub's asset CDN may stream without a `Content-Length`; the size from
/// the release listing stands in for it.
fn expected_total(content_length: Option<u64>, listed_size: u64) -> u64 {
    content_length.filter(|len| *len > 0).unwrap_or(listed_size)
}

/// Compare a computed digest with a user supplied one
fn checksum_matches(actual: &str, expected: &str) -> bool {
    actual.eq_ignore_ascii_case(expected.trim())
}
