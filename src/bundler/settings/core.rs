//! Core Settings struct and implementations.

use super::ManifestPattern;
use std::path::{Path, PathBuf};

/// File extension of Alfred workflow packages.
pub const PACKAGE_EXTENSION: &str = "alfredworkflow";

/// Main settings for packaging and publishing a workflow.
///
/// Central configuration constructed via [`SettingsBuilder`](super::SettingsBuilder).
/// Everything the pipelines need is carried here explicitly; nothing is read
/// from globals once the settings are built.
///
/// # Examples
///
/// ```no_run
/// use alfred_workflow_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> alfred_workflow_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root(".")
///     .workflow_name("Git Open")
///     .build()?;
///
/// assert_eq!(settings.package_file_name(None), "Git Open.alfredworkflow");
/// assert_eq!(settings.package_file_name(Some("v1.2.0")), "Git Open-v1.2.0.alfredworkflow");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory containing the workflow sources.
    project_root: PathBuf,

    /// Human-readable workflow name, used for package file names and release titles.
    workflow_name: String,

    /// Ordered file manifest.
    manifest: Vec<ManifestPattern>,

    /// Release repository as `owner/repo`.
    ///
    /// None lets the release tool infer it from the git remote.
    release_repo_id: Option<String>,

    /// Metadata file name, relative to the project root.
    metadata_file: PathBuf,

    /// Build directory, relative to the project root.
    build_dir: PathBuf,

    /// Handlebars template for release titles (`name`, `tag`, `version`).
    title_template: String,

    /// Command used to open the finished package. None means the platform default.
    opener: Option<String>,
}

impl Settings {
    /// Returns the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the workflow name.
    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Returns the manifest patterns in order.
    pub fn manifest(&self) -> &[ManifestPattern] {
        &self.manifest
    }

    /// Returns the release repository identifier, if configured.
    pub fn release_repo_id(&self) -> Option<&str> {
        self.release_repo_id.as_deref()
    }

    /// Returns the metadata file name (relative).
    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    /// Returns the absolute location of the metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.project_root.join(&self.metadata_file)
    }

    /// Returns the build directory location.
    pub fn build_dir(&self) -> PathBuf {
        self.project_root.join(&self.build_dir)
    }

    /// Returns the release title template.
    pub fn title_template(&self) -> &str {
        &self.title_template
    }

    /// Returns the opener override, if any.
    pub fn opener(&self) -> Option<&str> {
        self.opener.as_deref()
    }

    /// Package file name: `<name>.alfredworkflow`, or `<name>-<tag>.alfredworkflow`
    /// when a release tag is given.
    pub fn package_file_name(&self, tag: Option<&str>) -> String {
        match tag {
            Some(tag) => format!("{}-{}.{}", self.workflow_name, tag, PACKAGE_EXTENSION),
            None => format!("{}.{}", self.workflow_name, PACKAGE_EXTENSION),
        }
    }

    /// Package location in the project root.
    pub fn package_path(&self, tag: Option<&str>) -> PathBuf {
        self.project_root.join(self.package_file_name(tag))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        project_root: PathBuf,
        workflow_name: String,
        manifest: Vec<ManifestPattern>,
        release_repo_id: Option<String>,
        metadata_file: PathBuf,
        build_dir: PathBuf,
        title_template: String,
        opener: Option<String>,
    ) -> Self {
        Self {
            project_root,
            workflow_name,
            manifest,
            release_repo_id,
            metadata_file,
            build_dir,
            title_template,
            opener,
        }
    }
}
