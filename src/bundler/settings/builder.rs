//! Builder for constructing Settings.

use super::{ManifestPattern, Settings, default_manifest};
use crate::bail;
use std::path::{Component, Path, PathBuf};

/// Default metadata file of an Alfred workflow.
pub const DEFAULT_METADATA_FILE: &str = "info.plist";

/// Default build directory name.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Default release title template.
pub const DEFAULT_TITLE_TEMPLATE: &str = "{{name}} {{tag}}";

/// Default release-hosting CLI.
pub const DEFAULT_RELEASE_TOOL: &str = "gh";

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use alfred_workflow_bundler::bundler::{ManifestPattern, SettingsBuilder};
///
/// # fn example() -> alfred_workflow_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_root("/work/alfred-git-open")
///     .workflow_name("Git Open")
///     .manifest(vec![
///         ManifestPattern::required("*.py"),
///         ManifestPattern::required("info.plist"),
///     ])
///     .release_repo_id("https://github.com/someone/alfred-git-open")
///     .build()?;
///
/// assert_eq!(settings.release_repo_id(), Some("someone/alfred-git-open"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_root: Option<PathBuf>,
    workflow_name: Option<String>,
    manifest: Option<Vec<ManifestPattern>>,
    release_repo_id: Option<String>,
    metadata_file: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    title_template: Option<String>,
    opener: Option<String>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the workflow name.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn workflow_name(mut self, name: impl Into<String>) -> Self {
        self.workflow_name = Some(name.into());
        self
    }

    /// Sets the file manifest.
    ///
    /// Default: scripts, metadata file, icon, optional readme
    pub fn manifest(mut self, manifest: Vec<ManifestPattern>) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Sets the release repository (`owner/repo` or a GitHub URL).
    ///
    /// Default: None (release tool infers it from the git remote)
    pub fn release_repo_id(mut self, repo: impl Into<String>) -> Self {
        self.release_repo_id = Some(repo.into());
        self
    }

    /// Sets the metadata file name.
    ///
    /// Default: `info.plist`
    pub fn metadata_file<P: AsRef<Path>>(mut self, file: P) -> Self {
        self.metadata_file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Sets the build directory, relative to the project root.
    ///
    /// Default: `build`
    pub fn build_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.build_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the release title template.
    ///
    /// Default: `{{name}} {{tag}}`
    pub fn title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = Some(template.into());
        self
    }

    /// Sets the command used to open the finished package.
    ///
    /// Default: platform opener
    pub fn opener(mut self, opener: impl Into<String>) -> Self {
        self.opener = Some(opener.into());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `project_root` or `workflow_name` is missing, or the name is blank
    /// - the build directory is not a plain relative subdirectory
    /// - the manifest is empty
    /// - the release repository cannot be parsed
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let project_root = self.project_root.context("project_root is required")?;
        let workflow_name = self
            .workflow_name
            .context("workflow name is required (set it in info.plist, workflow.toml, or --name)")?
            .trim()
            .to_string();
        if workflow_name.is_empty() {
            bail!("workflow name cannot be empty");
        }

        let metadata_file = self
            .metadata_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_FILE));

        let build_dir = self
            .build_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
        validate_build_dir(&build_dir)?;

        let manifest = match self.manifest {
            Some(manifest) => manifest,
            None => default_manifest(&metadata_file.to_string_lossy()),
        };
        if manifest.is_empty() {
            bail!("manifest must contain at least one pattern");
        }

        let release_repo_id = self
            .release_repo_id
            .map(|repo| normalize_repo_id(&repo))
            .transpose()?;

        Ok(Settings::new(
            project_root,
            workflow_name,
            manifest,
            release_repo_id,
            metadata_file,
            build_dir,
            self.title_template
                .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string()),
            self.opener,
        ))
    }
}

/// The build directory is deleted wholesale, so it must be a strict
/// subdirectory of the project root.
fn validate_build_dir(build_dir: &Path) -> crate::bundler::Result<()> {
    let mut normal = 0;
    for component in build_dir.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            _ => bail!(
                "build directory must be a relative path inside the project root, got {}",
                build_dir.display()
            ),
        }
    }
    if normal == 0 {
        bail!(
            "build directory must name a subdirectory of the project root, got '{}'",
            build_dir.display()
        );
    }
    Ok(())
}

/// Normalizes `owner/repo` or a GitHub URL to `owner/repo`.
pub fn normalize_repo_id(repo: &str) -> crate::bundler::Result<String> {
    let repo = repo.trim();

    if repo.contains("://") {
        let url = url::Url::parse(repo).map_err(|e| {
            crate::bundler::Error::GenericError(format!("invalid repository URL '{repo}': {e}"))
        })?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        if segments.len() != 2 {
            bail!("repository URL must point at owner/repo, got '{repo}'");
        }
        let name = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
        return Ok(format!("{}/{}", segments[0], name));
    }

    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        bail!("repository must be 'owner/repo' or a GitHub URL, got '{repo}'");
    }
    Ok(repo.to_string())
}
