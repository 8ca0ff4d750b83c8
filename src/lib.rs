//! raydeps - prebuilt raylib fetcher
//!
//! Downloads the raylib release archive published for a platform,
//! unpacks it into `build/deps.<platform>/raylib-<version>/` and reports
//! what a build needs to compile and link against it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Platform naming, version resolution and the fetch flow
//! - [`releases`] - GitHub releases client
//! - [`infra`] - Infrastructure layer (network, archives, filesystem)
//! - [`config`] - Constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod releases;

#[cfg(test)]
pub mod test_utils;
