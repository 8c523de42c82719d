//! Configuration structures for packaging operations.
//!
//! This module provides the explicit [`Settings`] passed into both pipelines,
//! the file manifest types, and a builder for constructing settings.

mod builder;
mod core;
mod manifest;

pub use builder::{
    DEFAULT_BUILD_DIR, DEFAULT_METADATA_FILE, DEFAULT_RELEASE_TOOL, DEFAULT_TITLE_TEMPLATE,
    SettingsBuilder, normalize_repo_id,
};
pub use core::{PACKAGE_EXTENSION, Settings};
pub use manifest::{ManifestPattern, default_manifest};
