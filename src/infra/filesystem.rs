//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Move every child of `src` into `dst`
pub fn move_tree(src: &Path, dst: &Path) -> Result<(), FilesystemError> {
    tracing::info!("moving tree '{}' to '{}'", src.display(), dst.display());

    create_dir_all(dst)?;
    for entry in read_dir(src)? {
        let from = entry.path();
        let to = dst.join(entry.file_name());
        move_entry(&from, &to)?;
    }
    Ok(())
}

/// Collapse a directory whose only entry is a single subdirectory
///
/// Archives usually wrap their content in one top-level folder
/// (`raylib-5.0_linux_amd64/`). Its children are moved up and the empty
/// folder removed. Returns whether anything was moved.
pub fn flatten_single_root(dir: &Path) -> Result<bool, FilesystemError> {
    let entries = read_dir(dir)?;
    let [only] = entries.as_slice() else {
        return Ok(false);
    };

    let root = only.path();
    if !root.is_dir() {
        return Ok(false);
    }

    // Move to a sibling first so a child sharing the root's name cannot clash
    let staging = dir.join(format!(".{}.flatten", only.file_name().to_string_lossy()));
    move_entry(&root, &staging)?;
    move_tree(&staging, dir)?;
    std::fs::remove_dir(&staging).map_err(|e| FilesystemError::RemoveDir {
        path: staging.clone(),
        error: e.to_string(),
    })?;

    Ok(true)
}

fn read_dir(path: &Path) -> Result<Vec<std::fs::DirEntry>, FilesystemError> {
    let read_error = |e: std::io::Error| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut entries = std::fs::read_dir(path)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(std::fs::DirEntry::file_name);
    Ok(entries)
}

/// Rename, falling back to copy + delete across filesystems
fn move_entry(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    let move_error = |e: String| FilesystemError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e,
    };

    if from.is_dir() {
        for entry in walkdir::WalkDir::new(from) {
            let entry = entry.map_err(|e| move_error(e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| move_error(e.to_string()))?;
            let target = to.join(relative);
            if entry.file_type().is_dir() {
                create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target).map_err(|e| move_error(e.to_string()))?;
            }
        }
        remove_dir_all(from)
    } else {
        std::fs::copy(from, to).map_err(|e| move_error(e.to_string()))?;
        std::fs::remove_file(from).map_err(|e| move_error(e.to_string()))
    }
}
