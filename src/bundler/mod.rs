//! Alfred workflow packaging.
//!
//! This module turns a workflow project directory into a `.alfredworkflow`
//! package: it validates the project, resolves the file manifest, stages the
//! files flat into a build directory, and writes a deterministic zip.
//!
//! # Configuration
//!
//! Packaging is driven by an explicit [`Settings`] value, usually resolved
//! from `workflow.toml`, `info.plist`, and command-line flags (see
//! [`crate::metadata`]).
//!
//! # Layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `settings` | [`Settings`], [`SettingsBuilder`], [`ManifestPattern`] |
//! | `collect` | Metadata precondition and manifest resolution |
//! | `archive` | Zip writing |
//! | `builder` | [`Bundler`] orchestration and [`Pipeline`] stages |
//! | `utils` | Scoped filesystem cleanup and subprocess execution |

#![warn(missing_docs)]

pub mod archive;
mod builder;
pub mod collect;
pub mod error;
mod settings;
pub mod utils;

// Public re-exports
pub use builder::{
    ArtifactRetention, Bundler, PackageRequest, PackagedWorkflow, Pipeline, PipelineStage,
    calculate_sha256, default_opener, find_release_tool,
};
pub use error::{Error, Result};
pub use settings::{
    DEFAULT_BUILD_DIR, DEFAULT_METADATA_FILE, DEFAULT_RELEASE_TOOL, DEFAULT_TITLE_TEMPLATE,
    ManifestPattern, PACKAGE_EXTENSION, Settings, SettingsBuilder, default_manifest,
    normalize_repo_id,
};
