//! Package orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator and the pipeline
//! stage tracker shared by the install and release commands.
//!
//! # Overview
//!
//! The bundler:
//! 1. Checks that the metadata file exists
//! 2. Resolves the file manifest
//! 3. Stages the files flat into a fresh build directory
//! 4. Writes the `.alfredworkflow` archive and calculates its checksum
//! 5. Returns a [`PackagedWorkflow`] that owns the intermediate artifacts
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for packages
//! - [`orchestrator`] - Main [`Bundler`] struct and packaging operations
//! - [`stage`] - Pipeline stage tracking
//! - [`tool_detection`] - External tool availability checking

mod checksum;
mod orchestrator;
mod stage;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::{ArtifactRetention, Bundler, PackageRequest, PackagedWorkflow};
pub use stage::{Pipeline, PipelineStage};
pub use tool_detection::{default_opener, find_release_tool};
