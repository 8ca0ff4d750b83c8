//! CLI implementation for `raydeps clean` command

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{self, status, OutputConfig};
use crate::core::layout::list_deps_dirs;
use crate::error::RaydepsError;
use crate::infra::filesystem;

#[derive(Debug, Serialize)]
struct CleanReport {
    removed: Vec<PathBuf>,
}

/// Remove every `build/deps.*` directory under `base_dir`
pub fn clean_deps(base_dir: &Path) -> Result<Vec<PathBuf>, RaydepsError> {
    let dirs = list_deps_dirs(base_dir);
    for dir in &dirs {
        tracing::info!("Removing {}", dir.display());
        filesystem::remove_dir_all(dir)?;
    }
    Ok(dirs)
}

/// Execute the clean command
pub fn execute(base_dir: &Path) -> Result<()> {
    let removed = clean_deps(base_dir)?;

    if OutputConfig::current().json {
        return output::print_json(&CleanReport { removed });
    }

    if removed.is_empty() {
        output::message(&format!("{} Nothing to clean", status::WARNING));
        return Ok(());
    }
    for dir in &removed {
        output::message(&format!("{} Removed {}", status::SUCCESS, dir.display()));
    }
    Ok(())
}
