//! Release hosting URLs

/// GitHub REST API base URL
pub const GITHUB_API: &str = "https://api.github.com";

/// Media type requested from the GitHub REST API
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
