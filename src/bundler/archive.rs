//! Workflow package archive creation.
//!
//! A `.alfredworkflow` file is a zip of the workflow's files at the top level.
//! Entries are written in name order with a fixed timestamp and fixed
//! permissions, so unchanged input always yields a byte-identical archive.

use crate::bundler::{
    Error, Result,
    error::ErrorExt,
    utils::fs::ScopedPath,
};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, DateTime, ZipWriter, write::SimpleFileOptions};

/// Permissions recorded for every entry.
const ENTRY_PERMISSIONS: u32 = 0o644;

/// Zips the top-level files of `staging_dir` into `destination`.
///
/// Any existing file at `destination` is replaced. A partially written
/// archive is removed if writing fails.
///
/// # Returns
///
/// Entry names in archive order.
pub async fn create_archive(staging_dir: &Path, destination: &Path) -> Result<Vec<String>> {
    let staging_dir = staging_dir.to_path_buf();
    let destination = destination.to_path_buf();

    tokio::task::spawn_blocking(move || write_archive(&staging_dir, &destination))
        .await
        .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))?
}

fn write_archive(staging_dir: &Path, destination: &Path) -> Result<Vec<String>> {
    let entries = staged_entries(staging_dir)?;

    let partial = ScopedPath::file(destination);
    let file = File::create(destination).fs_context("creating archive", destination)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut names = Vec::with_capacity(entries.len());
    for (name, path) in entries {
        zip.start_file(name.as_str(), options)?;
        let mut source = File::open(&path).fs_context("opening staged file", &path)?;
        io::copy(&mut source, &mut zip).fs_context("compressing staged file", &path)?;
        log::debug!("Added {} to archive", name);
        names.push(name);
    }

    let writer = zip.finish()?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .fs_context("flushing archive", destination)?;

    partial.keep();
    Ok(names)
}

/// Lists the staged files sorted by name. The staging directory is flat, so a
/// subdirectory there means something other than the pipeline wrote into it.
fn staged_entries(staging_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(staging_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            return Err(Error::GenericError(format!(
                "unexpected non-file entry in build directory: {}",
                entry.path().display()
            )));
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((name, entry.into_path()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn staged(files: &[(&str, &str)]) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let build = temp.path().join("build");
        std::fs::create_dir_all(&build).unwrap();
        for (name, body) in files {
            std::fs::write(build.join(name), body).unwrap();
        }
        temp
    }

    #[tokio::test]
    async fn archive_is_flat_and_sorted() {
        let temp = staged(&[("info.plist", "<plist/>"), ("a.py", "print(1)"), ("icon.png", "png")]);
        let dest = temp.path().join("Git Open.alfredworkflow");

        let names = create_archive(&temp.path().join("build"), &dest).await.unwrap();
        assert_eq!(names, ["a.py", "icon.png", "info.plist"]);

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 3);
        let mut body = String::new();
        archive
            .by_name("a.py")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "print(1)");
    }

    #[tokio::test]
    async fn repeated_archives_are_identical() {
        let temp = staged(&[("a.py", "print(1)"), ("info.plist", "<plist/>")]);
        let build = temp.path().join("build");
        let first = temp.path().join("first.zip");
        let second = temp.path().join("second.zip");

        create_archive(&build, &first).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        create_archive(&build, &second).await.unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[tokio::test]
    async fn nested_directories_are_rejected_without_leaving_a_file() {
        let temp = staged(&[("a.py", "print(1)")]);
        let build = temp.path().join("build");
        std::fs::create_dir_all(build.join("nested")).unwrap();
        let dest = temp.path().join("out.alfredworkflow");

        assert!(create_archive(&build, &dest).await.is_err());
        assert!(!dest.exists());
    }
}
