//! Manifest resolution.
//!
//! Turns the ordered [`ManifestPattern`] list into the concrete, flat file
//! list that gets staged. Patterns resolve against the project root; the
//! build directory and previously produced packages are never collected.

use crate::bundler::{
    Error, Result,
    settings::{PACKAGE_EXTENSION, Settings},
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// A file selected by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// Location in the project.
    pub source: PathBuf,
    /// Name inside the package (the source's basename).
    pub name: String,
}

/// Fails with [`Error::MetadataMissing`] unless the metadata file exists.
///
/// Reads only; performs no filesystem mutation.
pub fn ensure_metadata(settings: &Settings) -> Result<PathBuf> {
    let path = settings.metadata_path();
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::MetadataMissing { path })
    }
}

/// Resolves every manifest pattern and returns the files to package.
///
/// Order follows the manifest; matches of one pattern are sorted by path.
/// The metadata file must be among the results.
pub fn collect_files(settings: &Settings) -> Result<Vec<CollectedFile>> {
    let root = settings.project_root();
    let build_dir = settings.build_dir();
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());

    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut files: Vec<CollectedFile> = Vec::new();
    let mut by_name: HashMap<String, PathBuf> = HashMap::new();

    for entry in settings.manifest() {
        let full_pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), entry.pattern);
        let mut matches = Vec::new();

        for path in glob::glob_with(&full_pattern, options)? {
            let path = path.map_err(|e| Error::IoError(e.into_error()))?;
            if !path.is_file() || is_excluded(&path, &build_dir) {
                continue;
            }
            matches.push(path);
        }
        matches.sort();

        if matches.is_empty() {
            if entry.required {
                return Err(Error::NoMatches {
                    pattern: entry.pattern.clone(),
                    root: root.to_path_buf(),
                });
            }
            log::debug!("Optional pattern '{}' matched nothing", entry.pattern);
            continue;
        }

        for source in matches {
            let Some(name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            match by_name.get(&name) {
                Some(existing) if *existing == source => {
                    log::debug!("{} already collected", source.display());
                }
                Some(existing) => {
                    return Err(Error::DuplicateEntry {
                        name,
                        first: existing.clone(),
                        second: source,
                    });
                }
                None => {
                    log::debug!("Collected {} via '{}'", source.display(), entry.pattern);
                    by_name.insert(name.clone(), source.clone());
                    files.push(CollectedFile { source, name });
                }
            }
        }
    }

    let metadata_path = settings.metadata_path();
    if !files.iter().any(|f| f.source == metadata_path) {
        return Err(Error::MetadataNotCollected {
            path: metadata_path,
        });
    }

    Ok(files)
}

fn is_excluded(path: &Path, build_dir: &Path) -> bool {
    let in_build_dir = path
        .parent()
        .is_some_and(|parent| parent.starts_with(build_dir));
    let is_package = path
        .extension()
        .is_some_and(|ext| ext == PACKAGE_EXTENSION);
    in_build_dir || is_package
}
