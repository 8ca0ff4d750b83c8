//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::Predicate;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test project context
///
/// Creates a temporary project directory plus an isolated config
/// directory so the user's settings never leak into a test.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary directory used as `RAYDEPS_CONFIG_DIR`
    pub config: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            config: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Write the user settings file
    pub fn write_settings(&self, content: &str) {
        std::fs::write(self.config.path().join("config.toml"), content)
            .expect("Failed to write settings");
    }

    /// Build a raydeps command running inside the project
    pub fn command(&self, api_url: Option<&str>) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_raydeps"));
        cmd.current_dir(self.dir.path());
        cmd.env("RAYDEPS_CONFIG_DIR", self.config.path());
        cmd.env_remove("GITHUB_TOKEN");
        cmd.env_remove("RUST_LOG");
        match api_url {
            Some(url) => cmd.env("RAYDEPS_GITHUB_API", url),
            // Nothing listens here; network access fails fast
            None => cmd.env("RAYDEPS_GITHUB_API", "http://127.0.0.1:9"),
        };
        cmd
    }

    /// Run raydeps with `args` on a blocking thread
    pub async fn run(&self, api_url: Option<&str>, args: &[&str]) -> Output {
        let mut cmd = self.command(api_url);
        cmd.args(args);
        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute raydeps"))
            .await
            .expect("raydeps thread panicked")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform name used by the mocked release
pub const TEST_PLATFORM: &str = "linux_amd64";

/// Build a gzip-compressed tar archive in memory
pub fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .expect("Failed to append tar entry");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip")
}

/// Build a zip archive in memory
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// The archive layout raylib publishes for Linux
pub fn raylib_linux_archive(version: &str) -> Vec<u8> {
    let root = format!("raylib-{version}_linux_amd64");
    tar_gz(&[
        (&format!("{root}/include/raylib.h"), "// raylib"),
        (&format!("{root}/include/raymath.h"), "// raymath"),
        (&format!("{root}/lib/libraylib.a"), "!<arch>\n"),
        (&format!("{root}/LICENSE"), "zlib"),
    ])
}

/// Assert captured output satisfies `predicate`, showing both on failure
pub fn assert_output(text: &str, predicate: impl Predicate<str>) {
    assert!(
        predicate.eval(text),
        "output does not satisfy `{predicate}`:\n{text}"
    );
}

/// Write `bytes` to a file
pub fn write_bytes(path: &Path, bytes: &[u8]) {
    File::create(path)
        .and_then(|mut f| f.write_all(bytes))
        .expect("Failed to write file");
}

/// Mock a release tagged `tag` whose assets are `(name, archive)` pairs
pub async fn mount_release(server: &MockServer, tag: &str, assets: &[(&str, Vec<u8>)]) {
    let assets_path = format!("/repos/raysan5/raylib/releases/{tag}/assets");
    let release = serde_json::json!({
        "tag_name": tag,
        "assets_url": format!("{}{assets_path}", server.uri()),
    });

    Mock::given(method("GET"))
        .and(path(format!("/repos/raysan5/raylib/releases/tags/{tag}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(release))
        .mount(server)
        .await;

    let listing: Vec<serde_json::Value> = assets
        .iter()
        .map(|(name, bytes)| {
            serde_json::json!({
                "name": name,
                "size": bytes.len(),
                "browser_download_url": format!("{}/download/{name}", server.uri()),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(assets_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    for (name, bytes) in assets {
        Mock::given(method("GET"))
            .and(path(format!("/download/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.clone()))
            .mount(server)
            .await;
    }
}

/// Mock `releases/latest` pointing at an already mounted tag
pub async fn mount_latest(server: &MockServer, tag: &str) {
    Mock::given(method("GET"))
        .and(path("/repos/raysan5/raylib/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tag_name": tag,
            "assets_url": format!(
                "{}/repos/raysan5/raylib/releases/{tag}/assets",
                server.uri()
            ),
        })))
        .mount(server)
        .await;
}
