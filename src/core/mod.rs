//! Core business logic module
//!
//! # Submodules
//!
//! - [`platform`] - Platform naming and asset matching
//! - [`version`] - Release tag candidates
//! - [`layout`] - On-disk layout of fetched releases
//! - [`fetch`] - Resolve, download and unpack a release
//! - [`link`] - Compiler and linker inputs for a fetched release
//! - [`settings`] - User settings file

pub mod fetch;
pub mod layout;
pub mod link;
pub mod platform;
pub mod settings;
pub mod version;
