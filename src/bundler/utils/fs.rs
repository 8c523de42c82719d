//! File system utilities for packaging.
//!
//! Provides idempotent directory and file operations and [`ScopedPath`], a
//! guard that removes a path when it goes out of scope.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(Error::Fs {
            context: "removing directory",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing file",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{from:?} does not exist")));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

/// What a [`ScopedPath`] removes on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedKind {
    /// A directory tree
    Dir,
    /// A single file
    File,
}

/// Removes the guarded path when dropped, on success and error paths alike.
///
/// Call [`ScopedPath::keep`] to hand the path over to the caller instead.
/// Removal in `drop` is synchronous: it runs while unwinding too, where no
/// runtime is guaranteed to be available.
#[derive(Debug)]
pub struct ScopedPath {
    path: PathBuf,
    kind: ScopedKind,
    armed: bool,
}

impl ScopedPath {
    /// Guards a directory tree.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ScopedKind::Dir,
            armed: true,
        }
    }

    /// Guards a single file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ScopedKind::File,
            armed: true,
        }
    }

    /// Disarms the guard and returns the path.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Removes the path now, reporting errors instead of logging them.
    pub async fn remove(mut self) -> Result<()> {
        self.armed = false;
        match self.kind {
            ScopedKind::Dir => remove_dir_all(&self.path).await,
            ScopedKind::File => remove_file(&self.path).await,
        }
    }
}

impl Drop for ScopedPath {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let result = match self.kind {
            ScopedKind::Dir => std::fs::remove_dir_all(&self.path),
            ScopedKind::File => std::fs::remove_file(&self.path),
        };
        match result {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
