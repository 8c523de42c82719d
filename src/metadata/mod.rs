//! Project metadata: `workflow.toml` and the workflow's `info.plist`.
//!
//! Settings are resolved in precedence order: command-line flags and
//! environment variables, then `workflow.toml`, then the `name` key of
//! `info.plist` (workflow name only), then built-in defaults.

mod info;
mod variables;

pub use info::{WorkflowInfo, read_workflow_info, stamp_version};
pub use variables::{KNOWN_VARIABLES, KnownVariable, VariableReport, inspect_variables};

use crate::bundler::{
    DEFAULT_METADATA_FILE, ManifestPattern, Settings, SettingsBuilder, default_manifest,
};
use crate::bundler::error::ErrorExt;
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file name in the project root.
pub const CONFIG_FILE_NAME: &str = "workflow.toml";

/// Parsed `workflow.toml`.
///
/// ```toml
/// [workflow]
/// name = "Git Open"
/// include = ["*.py", "info.plist", "icon.png"]
/// optional = ["README.md"]
///
/// [release]
/// repo = "owner/repo"
/// title = "{{name}} {{tag}}"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowFile {
    /// `[workflow]` table
    #[serde(default)]
    pub workflow: WorkflowSection,

    /// `[release]` table
    #[serde(default)]
    pub release: ReleaseSection,
}

/// `[workflow]` table of `workflow.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowSection {
    /// Workflow name
    pub name: Option<String>,
    /// Metadata file name
    pub metadata_file: Option<PathBuf>,
    /// Build directory
    pub build_dir: Option<PathBuf>,
    /// Required manifest patterns
    pub include: Option<Vec<String>>,
    /// Optional manifest patterns
    pub optional: Option<Vec<String>>,
}

/// `[release]` table of `workflow.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseSection {
    /// Repository as `owner/repo` or URL
    pub repo: Option<String>,
    /// Release title template
    pub title: Option<String>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Workflow name
    pub workflow_name: Option<String>,
    /// Build directory
    pub build_dir: Option<PathBuf>,
    /// Release repository
    pub release_repo_id: Option<String>,
    /// Package opener command
    pub opener: Option<String>,
}

/// Everything known about a workflow project before packaging starts.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Project root
    pub root: PathBuf,
    /// Contents of `workflow.toml` (defaults when absent)
    pub file: WorkflowFile,
    /// Contents of the metadata file, when it exists
    pub info: Option<WorkflowInfo>,
}

/// Loads the project configuration from `root`.
///
/// `config` names an explicit configuration file, which must exist; without
/// it `workflow.toml` in the root is used when present. The metadata file is
/// read when it exists; its absence is reported later by the pipeline.
/// Reads only.
pub fn load_project(root: &Path, config: Option<&Path>) -> Result<ProjectConfig> {
    let file = match config {
        Some(path) => load_workflow_file(path)?,
        None => {
            let default_path = root.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_workflow_file(&default_path)?
            } else {
                log::debug!("No {} in {}", CONFIG_FILE_NAME, root.display());
                WorkflowFile::default()
            }
        }
    };

    let metadata_path = root.join(metadata_file_of(&file));
    let info = if metadata_path.is_file() {
        Some(read_workflow_info(&metadata_path)?)
    } else {
        None
    };

    Ok(ProjectConfig {
        root: root.to_path_buf(),
        file,
        info,
    })
}

/// Parses a `workflow.toml` file.
pub fn load_workflow_file(path: &Path) -> Result<WorkflowFile> {
    let contents =
        std::fs::read_to_string(path).fs_context("reading configuration file", path)?;
    Ok(toml::from_str(&contents)?)
}

fn metadata_file_of(file: &WorkflowFile) -> PathBuf {
    file.workflow
        .metadata_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_FILE))
}

impl ProjectConfig {
    /// Metadata file name, relative to the root.
    pub fn metadata_file(&self) -> PathBuf {
        metadata_file_of(&self.file)
    }

    /// Version recorded in the metadata file, if any.
    pub fn current_version(&self) -> Option<&str> {
        self.info.as_ref().and_then(|i| i.version.as_deref())
    }

    /// File manifest from `workflow.toml`, falling back to the default.
    pub fn manifest(&self) -> Vec<ManifestPattern> {
        let metadata_file = self.metadata_file();
        let defaults = default_manifest(&metadata_file.to_string_lossy());

        let required = match &self.file.workflow.include {
            Some(include) => include.iter().cloned().map(ManifestPattern::required).collect(),
            None => defaults.iter().filter(|p| p.required).cloned().collect(),
        };
        let optional: Vec<ManifestPattern> = match &self.file.workflow.optional {
            Some(optional) => optional.iter().cloned().map(ManifestPattern::optional).collect(),
            None => defaults.into_iter().filter(|p| !p.required).collect(),
        };

        let mut manifest: Vec<ManifestPattern> = required;
        manifest.extend(optional);
        manifest
    }

    /// Builds [`Settings`] with `overrides` taking precedence.
    ///
    /// # Errors
    ///
    /// When no workflow name is available anywhere and the metadata file is
    /// missing, the missing metadata file is reported, since that is where the
    /// name normally comes from.
    pub fn resolve(&self, overrides: &SettingsOverrides) -> Result<Settings> {
        let name = overrides
            .workflow_name
            .clone()
            .or_else(|| self.file.workflow.name.clone())
            .or_else(|| self.info.as_ref().and_then(|i| i.name.clone()));

        let metadata_file = self.metadata_file();
        if name.is_none() && self.info.is_none() {
            return Err(crate::bundler::Error::MetadataMissing {
                path: self.root.join(&metadata_file),
            }
            .into());
        }

        let mut builder = SettingsBuilder::new()
            .project_root(&self.root)
            .metadata_file(&metadata_file)
            .manifest(self.manifest());

        if let Some(name) = name {
            builder = builder.workflow_name(name);
        }
        if let Some(dir) = overrides
            .build_dir
            .clone()
            .or_else(|| self.file.workflow.build_dir.clone())
        {
            builder = builder.build_dir(dir);
        }
        if let Some(repo) = overrides
            .release_repo_id
            .clone()
            .or_else(|| self.file.release.repo.clone())
        {
            builder = builder.release_repo_id(repo);
        }
        if let Some(title) = &self.file.release.title {
            builder = builder.title_template(title.clone());
        }
        if let Some(opener) = &overrides.opener {
            builder = builder.opener(opener.clone());
        }

        Ok(builder.build()?)
    }
}
