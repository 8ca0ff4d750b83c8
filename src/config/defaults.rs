//! Default configuration values

/// Repository whose releases carry the prebuilt raylib archives
pub const DEFAULT_REPO: &str = "raysan5/raylib";

/// raylib version fetched when none is requested
pub const DEFAULT_RAYLIB_VERSION: &str = "5.0";

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay between download retries (in milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Upper bound for the doubling retry delay (in milliseconds)
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Request timeout for API calls and downloads (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Connect timeout (in seconds)
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request; the GitHub API rejects requests without one
pub const USER_AGENT: &str = concat!("raydeps/", env!("CARGO_PKG_VERSION"));

/// Directory (relative to the base dir) that holds fetched dependencies
pub const BUILD_DIR: &str = "build";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
