//! Alfred workflow packaging and release library
//!
//! This library provides:
//! - Packaging of a workflow project into a `.alfredworkflow` archive
//! - Local installation by handing the package to the OS
//! - Publishing the package as a tagged GitHub release via `gh`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod publish;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
