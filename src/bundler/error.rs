//! Error types for packaging operations.
//!
//! [`Error`] covers everything that can go wrong between collecting the
//! manifest and handing the finished archive to the OS or the release tool.
//! The [`ErrorExt`] and [`Context`] extension traits attach path and message
//! context at the call site, and [`bail!`](crate::bail) returns early with a
//! [`Error::GenericError`].

use std::{fmt::Display, io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while staging, archiving, or publishing a workflow.
#[derive(Error, Debug)]
pub enum Error {
    /// Free-form error message.
    #[error("{0}")]
    GenericError(String),

    /// Raw I/O error without path context.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// I/O error on a specific path.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done when the error happened
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        error: io::Error,
    },

    /// The workflow metadata file is not present in the project root.
    #[error(
        "{} not found. Run this command from the workflow project root (or pass --project-dir).",
        path.display()
    )]
    MetadataMissing {
        /// Expected location of the metadata file
        path: PathBuf,
    },

    /// A required external tool could not be resolved.
    #[error("{tool} is not installed or not on PATH. {hint}")]
    ToolNotFound {
        /// Tool name as looked up
        tool: String,
        /// Installation hint
        hint: &'static str,
    },

    /// An external command could not be spawned.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Command that failed to start
        command: String,
        /// Spawn error
        #[source]
        error: io::Error,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("{command} exited with {status}{}", format_stderr(stderr))]
    CommandStatus {
        /// Command line that was executed
        command: String,
        /// Exit status
        status: ExitStatus,
        /// Captured standard error, if any
        stderr: String,
    },

    /// A required manifest pattern matched no files.
    #[error("manifest pattern '{pattern}' matched no files in {}", root.display())]
    NoMatches {
        /// Pattern as configured
        pattern: String,
        /// Directory the pattern was resolved against
        root: PathBuf,
    },

    /// The manifest resolved without selecting the metadata file.
    #[error("manifest does not include {}; add it to the workflow include patterns", path.display())]
    MetadataNotCollected {
        /// Location of the metadata file
        path: PathBuf,
    },

    /// Two different files would land on the same name in the flat build directory.
    #[error(
        "'{name}' is matched by both {} and {}; the package is flat so basenames must be unique",
        first.display(),
        second.display()
    )]
    DuplicateEntry {
        /// Colliding file name
        name: String,
        /// First file collected under that name
        first: PathBuf,
        /// Second file with the same name
        second: PathBuf,
    },

    /// Invalid glob pattern in the manifest.
    #[error("invalid manifest pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Archive writing error.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Property list read/write error.
    #[error("property list error: {0}")]
    Plist(#[from] plist::Error),

    /// Release title template error.
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::RenderError>),

    /// Directory traversal error.
    #[error("directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Attaches path context to I/O results.
pub trait ErrorExt<T> {
    /// Converts an I/O error into [`Error::Fs`] naming the action and path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Adds a message to a failing `Result` or a missing `Option` value.
pub trait Context<T> {
    /// Wraps the failure with a static message.
    fn context<C: Display>(self, msg: C) -> Result<T>;

    /// Wraps the failure with a lazily built message.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{msg}: {e}")))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_names_path_and_action() {
        let err = std::fs::read("/definitely/not/here/info.plist")
            .fs_context("reading metadata", "/definitely/not/here/info.plist")
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("reading metadata /definitely/not/here/info.plist"));
    }

    #[test]
    fn option_context_becomes_generic_error() {
        let missing: Option<u8> = None;
        let err = missing.context("workflow name is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "workflow name is required"));
    }

    #[test]
    fn command_status_omits_empty_stderr() {
        assert_eq!(format_stderr("  \n"), "");
        assert_eq!(format_stderr("boom\n"), ": boom");
    }
}
