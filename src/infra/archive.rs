//! Archive extraction
//!
//! raylib ships `.zip` archives for Windows and WebAssembly and `.tar.gz`
//! archives for Linux and macOS.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::ArchiveError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// PKZIP archive
    Zip,
    /// Tar archive, gzip compression detected from the content
    Tar,
}

impl ArchiveFormat {
    /// Pick the format from an asset file name
    ///
    /// Only `.zip` is treated as zip; everything else is read as tar.
    pub fn from_name(name: &str) -> Self {
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        {
            Self::Zip
        } else {
            Self::Tar
        }
    }

    /// Name for a downloaded archive of this format inside a scratch dir
    pub fn scratch_file_name(self) -> &'static str {
        match self {
            Self::Zip => "archive.zip",
            Self::Tar => "archive.tar",
        }
    }
}

/// Unpack `archive` into `dest`, returning the number of files written
pub fn unpack_archive(
    archive: &Path,
    dest: &Path,
    format: ArchiveFormat,
) -> Result<usize, ArchiveError> {
    std::fs::create_dir_all(dest).map_err(|e| io_error(dest, &e))?;

    match format {
        ArchiveFormat::Zip => unpack_zip(archive, dest),
        ArchiveFormat::Tar => unpack_tar(archive, dest),
    }
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = File::open(archive).map_err(|e| io_error(archive, &e))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|_| ArchiveError::NotAZip {
        path: archive.to_path_buf(),
    })?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| ArchiveError::IoError {
            path: archive.to_path_buf(),
            error: e.to_string(),
        })?;

        let name = entry.name().to_string();
        let Some(target) = zip_entry_target(dest, &name) else {
            tracing::warn!("Skipping unsafe archive entry '{name}'");
            continue;
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| io_error(&target, &e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let mut out = File::create(&target).map_err(|e| io_error(&target, &e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| io_error(&target, &e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode)) {
                tracing::debug!("Keeping default mode for {}: {e}", target.display());
            }
        }

        written += 1;
    }

    tracing::debug!("Unpacked {written} file(s) from {}", archive.display());
    Ok(written)
}

/// Destination path for a zip entry, or `None` when the entry would escape
/// the destination
fn zip_entry_target(dest: &Path, name: &str) -> Option<PathBuf> {
    if name.starts_with('/') || name.starts_with('\\') || name.contains("..") {
        return None;
    }

    let target = name
        .split(['/', '\\'])
        .filter(|component| !component.is_empty())
        .fold(dest.to_path_buf(), |path, component| path.join(component));

    if target == dest {
        None
    } else {
        Some(target)
    }
}

fn unpack_tar(archive: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let not_a_tar = || ArchiveError::NotATar {
        path: archive.to_path_buf(),
    };

    let mut file = File::open(archive).map_err(|e| io_error(archive, &e))?;
    let mut magic = [0u8; 2];
    let gzipped = file.read_exact(&mut magic).is_ok() && magic == GZIP_MAGIC;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| io_error(archive, &e))?;

    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut tar = tar::Archive::new(reader);
    let entries = tar.entries().map_err(|_| not_a_tar())?;

    let mut seen = 0;
    let mut written = 0;
    for entry in entries {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(_) if seen == 0 => return Err(not_a_tar()),
            Err(e) => return Err(io_error(archive, &e)),
        };
        seen += 1;

        let is_file = entry.header().entry_type().is_file();
        let unpacked = entry.unpack_in(dest).map_err(|e| io_error(dest, &e))?;
        if !unpacked {
            let name = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            tracing::warn!("Skipping unsafe archive entry '{name}'");
        } else if is_file {
            written += 1;
        }
    }

    if seen == 0 {
        return Err(not_a_tar());
    }

    tracing::debug!("Unpacked {written} file(s) from {}", archive.display());
    Ok(written)
}

fn io_error(path: &Path, error: &std::io::Error) -> ArchiveError {
    ArchiveError::IoError {
        path: path.to_path_buf(),
        error: error.to_string(),
    }
}
