//! raylib version handling
//!
//! raylib tags its releases inconsistently: `5.0` and `5.5` for recent
//! releases, `4.5.0` and `3.7.0` for older ones. A requested version is turned
//! into a list of tags to try in order.

use semver::Version;
use thiserror::Error;

/// Errors related to version handling
#[derive(Error, Debug, PartialEq)]
pub enum VersionError {
    /// Invalid version format
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },
}

/// Whether a requested version means "whatever is newest"
pub fn is_latest(version: &str) -> bool {
    let version = version.trim();
    version.is_empty() || version.eq_ignore_ascii_case("latest")
}

/// Strip a leading `v` from a tag (`v4.0.0` -> `4.0.0`)
pub fn normalize_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Zero-pad a one or two component version to `X.0.0` / `X.Y.0`
///
/// Returns `None` when the version is already three components long or is
/// not numeric.
pub fn padded_semver(version: &str) -> Option<String> {
    let version = normalize_tag(version);
    let parts: Vec<&str> = version.split('.').collect();
    if parts.is_empty() || parts.len() >= 3 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let padded = match parts.as_slice() {
        [major] => format!("{major}.0.0"),
        [major, minor] => format!("{major}.{minor}.0"),
        _ => return None,
    };

    Version::parse(&padded).ok().map(|v| v.to_string())
}

/// Tags to try, in order, when looking up a release
///
/// The version as given always comes first. With `semver` enabled a
/// zero-padded form follows for short versions.
pub fn tag_candidates(version: &str, semver: bool) -> Vec<String> {
    let version = version.trim();
    let mut candidates = vec![version.to_string()];

    if semver {
        if let Some(padded) = padded_semver(version) {
            if padded != version {
                candidates.push(padded);
            }
        }
    }

    candidates
}

/// Parse a release tag as semver, padding short versions
pub fn parse_tag(tag: &str) -> Result<Version, VersionError> {
    let normalized = normalize_tag(tag);
    let candidate = padded_semver(normalized).unwrap_or_else(|| normalized.to_string());
    Version::parse(&candidate).map_err(|e| VersionError::InvalidVersion {
        version: tag.to_string(),
        reason: e.to_string(),
    })
}
