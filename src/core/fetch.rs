//! raylib dependency fetch logic
//!
//! Resolves the requested release, picks the asset for the target platform,
//! downloads it and unpacks it into `build/deps.<platform>/raylib-<version>/`.
//! An existing output directory means the work was already done.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::defaults;
use crate::core::layout::DepsLayout;
use crate::core::platform::{self, PlatformError};
use crate::core::settings::Settings;
use crate::core::version::{is_latest, normalize_tag, parse_tag, tag_candidates};
use crate::error::{ArchiveError, DownloadError, FilesystemError, ReleaseError};
use crate::infra::archive::{unpack_archive, ArchiveFormat};
use crate::infra::download::{DownloadManager, ProgressCallback};
use crate::infra::filesystem;
use crate::releases::{Asset, ReleaseClient};

/// Errors that can occur during fetch
#[derive(Error, Debug)]
pub enum FetchError {
    /// Release lookup failed
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Platform pattern is invalid
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// No asset of the release matches the platform
    #[error("there's no raylib '{version}' for '{platform}'")]
    NoMatchingAsset { version: String, platform: String },

    /// Download failed
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Unpacking failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Output directory handling failed
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// Temporary file handling failed
    #[error("IO error: {0}")]
    Io(String),
}

/// Options for fetching raylib
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Repository as `owner/name`
    pub repo: String,
    /// Requested version; empty for the latest release
    pub raylib_version: String,
    /// Platform name or asset regex
    pub plat_name: String,
    /// Detected host platform name
    pub host_platform: String,
    /// Disable zero-padded tag lookups
    pub no_semver: bool,
    /// Directory holding `build/`
    pub base_dir: PathBuf,
    /// Re-download even when the output directory exists
    pub force: bool,
    /// Expected SHA-256 of the archive
    pub sha256: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        let host_platform = platform::detect_host_platform();
        Self {
            repo: defaults::DEFAULT_REPO.to_string(),
            raylib_version: defaults::DEFAULT_RAYLIB_VERSION.to_string(),
            plat_name: host_platform.clone(),
            host_platform,
            no_semver: false,
            base_dir: PathBuf::from("."),
            force: false,
            sha256: None,
        }
    }
}

impl FetchOptions {
    /// Options seeded from user settings
    pub fn from_settings(settings: &Settings, base_dir: PathBuf) -> Self {
        Self {
            repo: settings.repo().to_string(),
            raylib_version: settings.raylib_version().to_string(),
            no_semver: settings.no_semver(),
            base_dir,
            ..Self::default()
        }
    }

    /// Platform name used for the output directory
    ///
    /// A user supplied regex may contain characters that are awkward in
    /// paths; those are replaced by `_`.
    pub fn platform_dir_name(&self) -> String {
        self.plat_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Layout for an already resolved version
    pub fn layout_for(&self, version: &str) -> DepsLayout {
        DepsLayout::new(&self.base_dir, &self.platform_dir_name(), version)
    }
}

/// A release tag together with its assets
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    /// Tag that was found
    pub tag: String,
    /// Assets attached to the release
    pub assets: Vec<Asset>,
}

/// Outcome of a fetch
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Output directory already existed; nothing was downloaded
    AlreadyPresent {
        /// Resolved version
        version: String,
        /// Existing layout
        layout: DepsLayout,
    },
    /// An asset was downloaded and unpacked
    Fetched {
        /// Resolved version
        version: String,
        /// Populated layout
        layout: DepsLayout,
        /// Asset that was downloaded
        asset: Asset,
        /// Archive size in bytes
        size: u64,
        /// SHA-256 of the archive
        checksum: String,
        /// Number of files unpacked
        files: usize,
    },
}

impl FetchOutcome {
    /// Layout of the fetched release
    pub fn layout(&self) -> &DepsLayout {
        match self {
            Self::AlreadyPresent { layout, .. } | Self::Fetched { layout, .. } => layout,
        }
    }

    /// Resolved raylib version
    pub fn version(&self) -> &str {
        match self {
            Self::AlreadyPresent { version, .. } | Self::Fetched { version, .. } => version,
        }
    }
}

/// Look up a release by version, trying each tag candidate in order
///
/// An empty version resolves the latest release.
pub async fn resolve_release(
    client: &ReleaseClient,
    repo: &str,
    version: &str,
    semver: bool,
) -> Result<ResolvedRelease, ReleaseError> {
    let release = if is_latest(version) {
        let release = client.latest_release(repo).await?;
        tracing::info!("latest '{repo}' release is '{}'", release.tag_name);
        release
    } else {
        find_release_by_tag(client, repo, version, semver).await?
    };

    let assets = client.list_assets(&release.assets_url).await?;
    Ok(ResolvedRelease {
        tag: release.tag_name,
        assets,
    })
}

async fn find_release_by_tag(
    client: &ReleaseClient,
    repo: &str,
    version: &str,
    semver: bool,
) -> Result<crate::releases::Release, ReleaseError> {
    let mut last_error = None;
    for tag in tag_candidates(version, semver) {
        match client.release_by_tag(repo, &tag).await {
            Ok(release) => return Ok(release),
            Err(e) if e.is_not_found() => {
                tracing::debug!("No release tagged '{tag}'");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ReleaseError::NotFound {
        url: format!("{}/tags/{version}", client.releases_url(repo).unwrap_or_default()),
    }))
}

/// Release tags of a repository, newest version first
///
/// Tags that don't parse as a version keep their API order after the rest.
pub async fn available_versions(
    client: &ReleaseClient,
    repo: &str,
) -> Result<Vec<String>, ReleaseError> {
    let mut tags: Vec<_> = client
        .list_releases(repo)
        .await?
        .into_iter()
        .map(|release| (parse_tag(&release.tag_name).ok(), release.tag_name))
        .collect();
    tags.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(tags.into_iter().map(|(_, tag)| tag).collect())
}

/// Download and unpack raylib for the configured platform
pub async fn fetch_dependencies(
    client: &ReleaseClient,
    downloads: &DownloadManager,
    options: &FetchOptions,
    progress: Option<ProgressCallback>,
) -> Result<FetchOutcome, FetchError> {
    crate::releases::client::validate_repo(&options.repo)?;
    let pattern = platform::asset_pattern(&options.plat_name, &options.host_platform)?;

    let semver = !options.no_semver;
    let mut resolved = None;
    let version = if is_latest(&options.raylib_version) {
        let release = resolve_release(client, &options.repo, "", semver).await?;
        let version = normalize_tag(&release.tag).to_string();
        resolved = Some(release);
        version
    } else {
        options.raylib_version.trim().to_string()
    };

    let layout = options.layout_for(&version);
    if layout.is_populated() {
        if !options.force {
            tracing::info!(
                "output directory '{}' already exist",
                layout.root().display()
            );
            return Ok(FetchOutcome::AlreadyPresent { version, layout });
        }
        tracing::info!("removing '{}' (forced)", layout.root().display());
        filesystem::remove_dir_all(layout.root())?;
    }

    let resolved = match resolved {
        Some(resolved) => resolved,
        None => resolve_release(client, &options.repo, &version, semver).await?,
    };

    let asset = platform::select_asset(&resolved.assets, &pattern)
        .cloned()
        .ok_or_else(|| FetchError::NoMatchingAsset {
            version: version.clone(),
            platform: options.plat_name.clone(),
        })?;

    // The asset name comes from the API and never becomes part of a path
    let format = ArchiveFormat::from_name(&asset.name);
    let scratch = tempfile::TempDir::new().map_err(|e| FetchError::Io(e.to_string()))?;
    let archive_path = scratch.path().join(format.scratch_file_name());

    tracing::info!("downloading '{}'", asset.name);
    let download = downloads
        .fetch_asset(&asset, &archive_path, options.sha256.as_deref(), progress)
        .await?;

    filesystem::create_dir_all(layout.root())?;
    tracing::info!("unpacking archive to '{}'", layout.root().display());
    let files = match unpack_into(&archive_path, &layout, format) {
        Ok(files) => files,
        Err(e) => {
            // A half-populated directory would be mistaken for a finished fetch
            let _ = filesystem::remove_dir_all(layout.root());
            return Err(e);
        }
    };

    Ok(FetchOutcome::Fetched {
        version,
        layout,
        asset,
        size: download.size,
        checksum: download.checksum,
        files,
    })
}

fn unpack_into(
    archive: &std::path::Path,
    layout: &DepsLayout,
    format: ArchiveFormat,
) -> Result<usize, FetchError> {
    let files = unpack_archive(archive, layout.root(), format)?;
    filesystem::flatten_single_root(layout.root())?;
    Ok(files)
}

/// Make sure raylib is present, fetching it only when missing
///
/// This is the hook a build script calls before compiling against raylib.
pub async fn ensure_dependencies(
    client: &ReleaseClient,
    downloads: &DownloadManager,
    options: &FetchOptions,
) -> Result<DepsLayout, FetchError> {
    if !is_latest(&options.raylib_version) {
        let layout = options.layout_for(options.raylib_version.trim());
        if layout.is_populated() {
            return Ok(layout);
        }
    }

    let options = FetchOptions {
        force: false,
        ..options.clone()
    };
    let outcome = fetch_dependencies(client, downloads, &options, None).await?;
    Ok(outcome.layout().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::write_tar_gz;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(base: &std::path::Path, plat: &str) -> FetchOptions {
        FetchOptions {
            plat_name: plat.to_string(),
            host_platform: plat.to_string(),
            base_dir: base.to_path_buf(),
            ..FetchOptions::default()
        }
    }

    async fn mount_release(server: &MockServer, tag: &str, archive: Vec<u8>) {
        let linux_name = format!("raylib-{tag}_linux_amd64.tar.gz");
        mount_release_with(server, tag, &linux_name, archive).await;
    }

    /// Release whose first asset is `linux_name`, served from `/dl/linux.tar.gz`
    async fn mount_release_with(server: &MockServer, tag: &str, linux_name: &str, archive: Vec<u8>) {
        let assets_path = format!("/repos/raysan5/raylib/releases/{tag}/assets");
        Mock::given(method("GET"))
            .and(path(format!("/repos/raysan5/raylib/releases/tags/{tag}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tag_name": tag,
                "assets_url": format!("{}{assets_path}", server.uri()),
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(assets_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "name": linux_name,
                    "browser_download_url": format!("{}/dl/linux.tar.gz", server.uri()),
                },
                {
                    "name": format!("raylib-{tag}_macos.tar.gz"),
                    "browser_download_url": format!("{}/dl/macos.tar.gz", server.uri()),
                }
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dl/linux.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
            .mount(server)
            .await;
    }

    fn linux_archive() -> Vec<u8> {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("raylib-5.0_linux_amd64/include/raylib.h", "// raylib"),
                ("raylib-5.0_linux_amd64/lib/libraylib.a", "!<arch>"),
            ],
        );
        std::fs::read(archive).unwrap()
    }

    #[test]
    fn test_fetch_options_default() {
        let options = FetchOptions::default();
        assert_eq!(options.repo, "raysan5/raylib");
        assert_eq!(options.raylib_version, "5.0");
        assert_eq!(options.plat_name, options.host_platform);
        assert!(!options.force);
    }

    #[test]
    fn test_platform_dir_name_sanitizes_regex() {
        let options = FetchOptions {
            plat_name: "win64_(msvc|mingw).*".to_string(),
            ..FetchOptions::default()
        };
        assert_eq!(options.platform_dir_name(), "win64__msvc_mingw_._");
    }

    #[tokio::test]
    async fn test_fetch_downloads_and_flattens() {
        let server = MockServer::start().await;
        mount_release(&server, "5.0", linux_archive()).await;

        let temp = TempDir::new().unwrap();
        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let outcome = fetch_dependencies(
            &client,
            &DownloadManager::with_config(1, 10),
            &options(temp.path(), "linux_amd64"),
            None,
        )
        .await
        .unwrap();

        let FetchOutcome::Fetched { asset, files, layout, .. } = outcome else {
            panic!("expected a fresh fetch");
        };
        assert_eq!(asset.name, "raylib-5.0_linux_amd64.tar.gz");
        assert_eq!(files, 2);
        assert!(layout.include_dir().join("raylib.h").exists());
        assert!(layout.static_lib().exists());
        assert!(layout
            .root()
            .ends_with("build/deps.linux_amd64/raylib-5.0"));
    }

    #[tokio::test]
    async fn test_existing_directory_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let opts = options(temp.path(), "linux_amd64");
        std::fs::create_dir_all(opts.layout_for("5.0").root()).unwrap();

        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let outcome = fetch_dependencies(&client, &DownloadManager::new(), &opts, None)
            .await
            .unwrap();
        assert!(matches!(outcome, FetchOutcome::AlreadyPresent { .. }));
    }

    #[tokio::test]
    async fn test_no_matching_asset() {
        let server = MockServer::start().await;
        mount_release(&server, "5.0", linux_archive()).await;

        let temp = TempDir::new().unwrap();
        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let opts = FetchOptions {
            plat_name: "android".to_string(),
            host_platform: "linux_amd64".to_string(),
            base_dir: temp.path().to_path_buf(),
            ..FetchOptions::default()
        };

        let err = fetch_dependencies(&client, &DownloadManager::new(), &opts, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "there's no raylib '5.0' for 'android'");
        assert!(!opts.layout_for("5.0").is_populated());
    }

    #[tokio::test]
    async fn test_padded_tag_is_tried_after_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/raysan5/raylib/releases/tags/4.5"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        mount_release(&server, "4.5.0", linux_archive()).await;

        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let release = resolve_release(&client, "raysan5/raylib", "4.5", true)
            .await
            .unwrap();
        assert_eq!(release.tag, "4.5.0");
        assert_eq!(release.assets.len(), 2);
    }

    #[tokio::test]
    async fn test_no_semver_stops_after_first_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/raysan5/raylib/releases/tags/4.5"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_release(&server, "4.5.0", linux_archive()).await;

        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let err = resolve_release(&client, "raysan5/raylib", "4.5", false)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_archive_leaves_no_output_dir() {
        let server = MockServer::start().await;
        mount_release(&server, "5.0", b"garbage".to_vec()).await;

        let temp = TempDir::new().unwrap();
        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let opts = options(temp.path(), "linux_amd64");

        let err = fetch_dependencies(&client, &DownloadManager::with_config(1, 10), &opts, None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Archive(ArchiveError::NotATar { .. })));
        assert!(!opts.layout_for("5.0").is_populated());
    }

    #[tokio::test]
    async fn test_asset_name_never_used_as_path() {
        let outside = TempDir::new().unwrap();
        let absolute = outside.path().join("raylib-5.0_linux_amd64.tar.gz");
        let climbing = format!("../raydeps-escape-{}_linux_amd64.tar.gz", std::process::id());
        let climbed = std::env::temp_dir().join(climbing.trim_start_matches("../"));

        for name in [absolute.display().to_string(), climbing.clone()] {
            let server = MockServer::start().await;
            mount_release_with(&server, "5.0", &name, linux_archive()).await;

            let temp = TempDir::new().unwrap();
            let client = ReleaseClient::with_api_url(&server.uri(), None);
            let outcome = fetch_dependencies(
                &client,
                &DownloadManager::with_config(1, 10),
                &options(temp.path(), "linux_amd64"),
                None,
            )
            .await
            .unwrap();

            let FetchOutcome::Fetched { asset, layout, .. } = outcome else {
                panic!("expected a fresh fetch");
            };
            assert_eq!(asset.name, name);
            assert!(layout.static_lib().exists());
        }

        assert!(!absolute.exists());
        assert!(!climbed.exists());
    }

    #[tokio::test]
    async fn test_ensure_fetches_missing_tree() {
        let server = MockServer::start().await;
        mount_release(&server, "5.0", linux_archive()).await;

        let temp = TempDir::new().unwrap();
        let opts = options(temp.path(), "linux_amd64");
        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let layout = ensure_dependencies(&client, &DownloadManager::with_config(1, 10), &opts)
            .await
            .unwrap();

        assert_eq!(layout, opts.layout_for("5.0"));
        assert!(layout.include_dir().join("raylib.h").exists());
        assert!(layout.static_lib().exists());
    }

    #[tokio::test]
    async fn test_ensure_uses_existing_tree() {
        let temp = TempDir::new().unwrap();
        let opts = options(temp.path(), "macos");
        std::fs::create_dir_all(opts.layout_for("5.0").lib_dir()).unwrap();

        // Unreachable API: ensure must not touch the network
        let client = ReleaseClient::with_api_url("http://127.0.0.1:9", None);
        let layout = ensure_dependencies(&client, &DownloadManager::new(), &opts)
            .await
            .unwrap();
        assert_eq!(layout, opts.layout_for("5.0"));
    }

    #[tokio::test]
    async fn test_available_versions_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/raysan5/raylib/releases"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "tag_name": "4.5.0", "assets_url": "" },
                { "tag_name": "nightly", "assets_url": "" },
                { "tag_name": "5.0", "assets_url": "" },
                { "tag_name": "v3.7.0", "assets_url": "" }
            ])))
            .mount(&server)
            .await;

        let client = ReleaseClient::with_api_url(&server.uri(), None);
        let tags = available_versions(&client, "raysan5/raylib").await.unwrap();
        assert_eq!(tags, ["5.0", "4.5.0", "v3.7.0", "nightly"]);
    }
}
