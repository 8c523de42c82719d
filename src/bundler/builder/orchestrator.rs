//! Main packaging orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that validates the
//! project, stages the manifest into the build directory, and writes the
//! workflow package.

use crate::bundler::{
    Result, Settings,
    collect::{collect_files, ensure_metadata},
    archive::create_archive,
    utils::fs::{self, ScopedPath},
};

use super::{
    checksum::calculate_sha256,
    stage::{Pipeline, PipelineStage},
};

/// What happens to the package file when the pipeline finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRetention {
    /// The package is the deliverable and stays in the project root.
    Keep,
    /// The package is intermediate and is removed on every exit path.
    RemoveOnExit,
}

/// Parameters of one packaging run.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Release tag; selects the versioned package name when set.
    pub tag: Option<String>,

    /// Version written into the staged metadata file.
    pub stamp_version: Option<String>,

    /// Fate of the package file.
    pub retention: ArtifactRetention,
}

impl PackageRequest {
    /// Request for a local install package.
    pub fn install() -> Self {
        Self {
            tag: None,
            stamp_version: None,
            retention: ArtifactRetention::Keep,
        }
    }

    /// Request for a release package.
    pub fn release(version: &str, tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            stamp_version: Some(version.to_string()),
            retention: ArtifactRetention::RemoveOnExit,
        }
    }
}

/// A written workflow package.
///
/// Holds the build directory (and, for [`ArtifactRetention::RemoveOnExit`],
/// the package file) until [`PackagedWorkflow::clean_up`] is called or the
/// value is dropped; both remove them.
#[derive(Debug)]
pub struct PackagedWorkflow {
    /// Package location
    pub path: std::path::PathBuf,

    /// Package size in bytes
    pub size: u64,

    /// SHA-256 checksum of the package
    pub checksum: String,

    /// Entry names in archive order
    pub entries: Vec<String>,

    staging: ScopedPath,
    package: Option<ScopedPath>,
}

impl PackagedWorkflow {
    /// Removes the build directory and, when not kept, the package file.
    pub async fn clean_up(self) -> Result<()> {
        let Self {
            staging, package, ..
        } = self;
        staging.remove().await?;
        if let Some(package) = package {
            package.remove().await?;
        }
        Ok(())
    }
}

/// Packaging orchestrator.
///
/// # Examples
///
/// ```no_run
/// use alfred_workflow_bundler::bundler::{Bundler, PackageRequest, Pipeline, PipelineStage, SettingsBuilder};
///
/// # async fn example() -> alfred_workflow_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .workflow_name("Git Open")
///     .build()?;
///
/// let mut pipeline = Pipeline::new("install");
/// pipeline.enter(PipelineStage::Validating)?;
///
/// let bundler = Bundler::new(settings);
/// let packaged = bundler.package(&mut pipeline, &PackageRequest::install()).await?;
/// println!("{} ({} bytes, sha256 {})", packaged.path.display(), packaged.size, packaged.checksum);
///
/// pipeline.enter(PipelineStage::Finalizing)?;
/// pipeline.enter(PipelineStage::CleanedUp)?;
/// packaged.clean_up().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validates the project, stages the manifest, and writes the package.
    ///
    /// Expects `pipeline` to be in [`PipelineStage::Validating`] and leaves
    /// it in [`PipelineStage::Archiving`]. Nothing is written before the
    /// metadata check and manifest resolution succeed. On error the pipeline
    /// is marked failed and the build directory is removed.
    pub async fn package(
        &self,
        pipeline: &mut Pipeline,
        request: &PackageRequest,
    ) -> Result<PackagedWorkflow> {
        // Validating: read-only checks
        ensure_metadata(&self.settings).map_err(|e| pipeline.fail(e))?;

        let settings = self.settings.clone();
        let files = tokio::task::spawn_blocking(move || collect_files(&settings))
            .await
            .map_err(|e| {
                crate::bundler::Error::GenericError(format!("Manifest task panicked: {}", e))
            })
            .and_then(|r| r)
            .map_err(|e| pipeline.fail(e))?;
        log::info!("Collected {} file(s) for {}", files.len(), self.settings.workflow_name());

        // Staging
        pipeline.enter(PipelineStage::Staging)?;
        let build_dir = self.settings.build_dir();
        let staging = ScopedPath::dir(&build_dir);

        fs::create_dir_all(&build_dir, true)
            .await
            .map_err(|e| pipeline.fail(e))?;
        for file in &files {
            fs::copy_file(&file.source, &build_dir.join(&file.name))
                .await
                .map_err(|e| pipeline.fail(e))?;
        }

        if let Some(version) = &request.stamp_version {
            let metadata_name = self
                .settings
                .metadata_file()
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            crate::metadata::stamp_version(&build_dir.join(metadata_name), version)
                .map_err(|e| pipeline.fail(e))?;
        }

        // Archiving
        pipeline.enter(PipelineStage::Archiving)?;
        let package_path = self.settings.package_path(request.tag.as_deref());
        let package = match request.retention {
            ArtifactRetention::Keep => None,
            ArtifactRetention::RemoveOnExit => Some(ScopedPath::file(&package_path)),
        };

        let entries = create_archive(&build_dir, &package_path)
            .await
            .map_err(|e| pipeline.fail(e))?;
        let size = tokio::fs::metadata(&package_path)
            .await
            .map_err(crate::bundler::Error::IoError)
            .map_err(|e| pipeline.fail(e))?
            .len();
        let checksum = calculate_sha256(&package_path)
            .await
            .map_err(|e| pipeline.fail(e))?;

        log::info!(
            "Wrote {} ({} entries, {} bytes)",
            package_path.display(),
            entries.len(),
            size
        );

        Ok(PackagedWorkflow {
            path: package_path,
            size,
            checksum,
            entries,
            staging,
            package,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{Error, SettingsBuilder};
    use std::path::Path;

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>name</key><string>Git Open</string><key>version</key><string>1.0.0</string></dict></plist>
"#;

    fn project() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a.py"), "print('a')").unwrap();
        std::fs::write(temp.path().join("info.plist"), PLIST).unwrap();
        std::fs::write(temp.path().join("icon.png"), "png").unwrap();
        temp
    }

    fn bundler(root: &Path) -> Bundler {
        Bundler::new(
            SettingsBuilder::new()
                .project_root(root)
                .workflow_name("Git Open")
                .build()
                .unwrap(),
        )
    }

    fn validating(name: &'static str) -> Pipeline {
        let mut pipeline = Pipeline::new(name);
        pipeline.enter(PipelineStage::Validating).unwrap();
        pipeline
    }

    #[tokio::test]
    async fn install_package_survives_cleanup() {
        let temp = project();
        let mut pipeline = validating("install");

        let packaged = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::install())
            .await
            .unwrap();

        assert_eq!(pipeline.stage(), PipelineStage::Archiving);
        assert_eq!(packaged.entries, ["a.py", "icon.png", "info.plist"]);
        assert_eq!(packaged.checksum.len(), 64);
        assert!(temp.path().join("build").is_dir());

        let path = packaged.path.clone();
        packaged.clean_up().await.unwrap();

        assert!(path.ends_with("Git Open.alfredworkflow"));
        assert!(path.is_file());
        assert!(!temp.path().join("build").exists());
    }

    #[tokio::test]
    async fn release_package_is_removed_when_dropped() {
        let temp = project();
        let mut pipeline = validating("release");

        let packaged = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::release("1.2.0", "v1.2.0"))
            .await
            .unwrap();
        let path = packaged.path.clone();
        assert!(path.ends_with("Git Open-v1.2.0.alfredworkflow"));
        assert!(path.is_file());

        drop(packaged);

        assert!(!path.exists());
        assert!(!temp.path().join("build").exists());
    }

    #[tokio::test]
    async fn release_stamps_only_the_staged_plist() {
        let temp = project();
        let mut pipeline = validating("release");

        let packaged = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::release("2.0.0", "v2.0.0"))
            .await
            .unwrap();

        let staged = crate::metadata::read_workflow_info(&temp.path().join("build/info.plist")).unwrap();
        assert_eq!(staged.version.as_deref(), Some("2.0.0"));
        let source = crate::metadata::read_workflow_info(&temp.path().join("info.plist")).unwrap();
        assert_eq!(source.version.as_deref(), Some("1.0.0"));

        packaged.clean_up().await.unwrap();
    }

    #[tokio::test]
    async fn missing_metadata_fails_before_any_write() {
        let temp = project();
        std::fs::remove_file(temp.path().join("info.plist")).unwrap();
        let before: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        let mut pipeline = validating("install");

        let err = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::install())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MetadataMissing { .. }));
        assert_eq!(pipeline.failed_in(), Some(PipelineStage::Validating));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), before.len());
    }

    #[tokio::test]
    async fn stale_build_dir_is_replaced() {
        let temp = project();
        std::fs::create_dir_all(temp.path().join("build")).unwrap();
        std::fs::write(temp.path().join("build/old.py"), "stale").unwrap();
        let mut pipeline = validating("install");

        let packaged = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::install())
            .await
            .unwrap();

        assert!(!packaged.entries.contains(&"old.py".to_string()));
        packaged.clean_up().await.unwrap();
    }

    #[tokio::test]
    async fn failed_manifest_leaves_no_build_dir() {
        let temp = project();
        std::fs::remove_file(temp.path().join("icon.png")).unwrap();
        let mut pipeline = validating("install");

        let err = bundler(temp.path())
            .package(&mut pipeline, &PackageRequest::install())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoMatches { .. }));
        assert!(!temp.path().join("build").exists());
    }

    #[tokio::test]
    async fn manifest_without_metadata_fails_before_staging() {
        let temp = project();
        let settings = SettingsBuilder::new()
            .project_root(temp.path())
            .workflow_name("Git Open")
            .manifest(vec![
                crate::bundler::ManifestPattern::required("*.py"),
                crate::bundler::ManifestPattern::required("icon.png"),
            ])
            .build()
            .unwrap();
        let mut pipeline = validating("release");

        let err = Bundler::new(settings)
            .package(&mut pipeline, &PackageRequest::release("1.2.0", "v1.2.0"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MetadataNotCollected { .. }));
        assert_eq!(pipeline.failed_in(), Some(PipelineStage::Validating));
        assert!(!temp.path().join("build").exists());
        assert!(!temp.path().join("Git Open-v1.2.0.alfredworkflow").exists());
    }
}
