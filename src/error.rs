//! Top-level error types.
//!
//! Packaging failures live in [`crate::bundler::Error`]; this module wraps
//! them together with CLI, configuration, and I/O errors.

use thiserror::Error;

/// Result type alias for command-level operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all command-level operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// CLI argument and input errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// workflow.toml parsing errors
    #[error("workflow.toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// info.plist parsing errors
    #[error("info.plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Packaging errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// The release version was empty after trimming
    #[error("Version cannot be empty")]
    EmptyVersion,
}

impl PackagerError {
    /// Process exit code for this error.
    ///
    /// Every failure maps to 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
