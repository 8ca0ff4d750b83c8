//! Link configuration for a fetched raylib release
//!
//! Windows archives are linked by library name together with the Win32
//! system libraries raylib depends on. Everywhere else the static
//! `libraylib.a` is linked directly.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::layout::DepsLayout;
use crate::core::platform::is_windows_like;

/// System libraries required by raylib on Windows
pub const WINDOWS_SYSTEM_LIBS: &[&str] = &["user32", "gdi32", "winmm", "shell32"];

/// Link configuration errors
#[derive(Error, Debug)]
pub enum LinkError {
    /// Release directory missing
    #[error("No raylib release found at '{path}'. Run 'raydeps fetch' first.")]
    NotFetched { path: PathBuf },
}

/// Compiler and linker inputs for building against raylib
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkConfig {
    /// Platform name the release was fetched for
    pub platform: String,
    /// Header search paths
    pub include_dirs: Vec<PathBuf>,
    /// Library search paths
    pub library_dirs: Vec<PathBuf>,
    /// Libraries linked by name
    pub libraries: Vec<String>,
    /// Object files or archives passed to the linker as-is
    pub extra_objects: Vec<PathBuf>,
}

impl LinkConfig {
    /// Build the link configuration for a layout without touching the disk
    pub fn for_platform(layout: &DepsLayout, platform: &str) -> Self {
        let mut libraries = Vec::new();
        let mut extra_objects = Vec::new();

        if is_windows_like(platform) {
            libraries.push("raylib".to_string());
            libraries.extend(WINDOWS_SYSTEM_LIBS.iter().map(ToString::to_string));
        } else {
            extra_objects.push(layout.static_lib());
        }

        Self {
            platform: platform.to_string(),
            include_dirs: vec![layout.include_dir()],
            library_dirs: vec![layout.lib_dir()],
            libraries,
            extra_objects,
        }
    }

    /// Build the link configuration, failing if nothing was fetched yet
    pub fn resolve(layout: &DepsLayout, platform: &str) -> Result<Self, LinkError> {
        if !layout.is_populated() {
            return Err(LinkError::NotFetched {
                path: layout.root().to_path_buf(),
            });
        }
        Ok(Self::for_platform(layout, platform))
    }

    /// Render as cargo build-script directives
    pub fn to_cargo_directives(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for dir in &self.library_dirs {
            lines.push(format!("cargo:rustc-link-search=native={}", dir.display()));
        }
        for lib in &self.libraries {
            lines.push(format!("cargo:rustc-link-lib={lib}"));
        }
        for object in &self.extra_objects {
            let is_static_raylib = object
                .file_name()
                .is_some_and(|n| n == crate::core::layout::STATIC_LIB_NAME);
            if is_static_raylib {
                lines.push("cargo:rustc-link-lib=static=raylib".to_string());
            } else {
                lines.push(format!("cargo:rustc-link-arg={}", object.display()));
            }
        }
        for dir in &self.include_dirs {
            lines.push(format!("cargo:include={}", dir.display()));
        }

        lines
    }
}
