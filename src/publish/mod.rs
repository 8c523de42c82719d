//! GitHub release publishing through the `gh` CLI.
//!
//! Authentication, upload, and release-note generation are delegated to
//! `gh release create`; this module only derives the tag and title and
//! assembles the command line.

use crate::bundler::utils::process;
use crate::error::CliError;
use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::Path,
};

/// A release version and the tag derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    /// Version as entered, trimmed
    pub version: String,
    /// `v` + version
    pub tag: String,
}

impl ReleaseVersion {
    /// Derives the tag from user input.
    ///
    /// Only empty (or whitespace-only) input is rejected; anything else is
    /// accepted as-is, with a warning when it is not a semantic version.
    pub fn parse(input: &str) -> Result<Self, CliError> {
        let version = input.trim();
        if version.is_empty() {
            return Err(CliError::EmptyVersion);
        }

        if semver::Version::parse(version).is_err() {
            log::warn!("Version '{}' is not a semantic version; using it as-is", version);
        }
        if version.starts_with('v') {
            log::warn!("Version '{}' already starts with 'v'; the tag will be 'v{}'", version, version);
        }

        Ok(Self {
            version: version.to_string(),
            tag: format!("v{version}"),
        })
    }
}

/// Renders the release title template.
///
/// The template sees `name`, `tag`, and `version`; unknown variables are an
/// error and nothing is HTML-escaped.
pub fn render_title(
    template: &str,
    workflow_name: &str,
    release: &ReleaseVersion,
) -> crate::bundler::Result<String> {
    let mut handlebars = handlebars::Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);

    let mut data = BTreeMap::new();
    data.insert("name", workflow_name);
    data.insert("tag", release.tag.as_str());
    data.insert("version", release.version.as_str());

    handlebars
        .render_template(template, &data)
        .map_err(|e| crate::bundler::Error::Template(Box::new(e)))
}

/// A `gh release create` invocation.
#[derive(Debug, Clone)]
pub struct GithubRelease<'a> {
    /// Tag to create
    pub tag: &'a str,
    /// Release title
    pub title: &'a str,
    /// Package to attach
    pub asset: &'a Path,
    /// Repository as `owner/repo`; None lets `gh` use the current repository
    pub repo: Option<&'a str>,
}

impl GithubRelease<'_> {
    /// Arguments passed to the release tool.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "release".into(),
            "create".into(),
            self.tag.into(),
            self.asset.as_os_str().to_os_string(),
            "--title".into(),
            self.title.into(),
            "--generate-notes".into(),
        ];
        if let Some(repo) = self.repo {
            args.push("--repo".into());
            args.push(repo.into());
        }
        args
    }

    /// Creates the release with `tool`, running in `cwd`.
    ///
    /// Returns whatever `gh` printed on stdout, normally the release URL.
    pub async fn create(&self, tool: &Path, cwd: &Path) -> crate::bundler::Result<String> {
        log::info!("Creating release {} with {}", self.tag, tool.display());
        let output = process::run(tool, self.args(), cwd).await?;
        Ok(output.stdout.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_v_plus_trimmed_version() {
        let release = ReleaseVersion::parse("  1.2.0 \n").unwrap();
        assert_eq!(release.version, "1.2.0");
        assert_eq!(release.tag, "v1.2.0");
    }

    #[test]
    fn free_form_versions_are_accepted() {
        assert_eq!(ReleaseVersion::parse("2024-beta").unwrap().tag, "v2024-beta");
    }

    #[test]
    fn empty_and_blank_versions_are_rejected() {
        for input in ["", "   ", "\n\t"] {
            assert!(matches!(
                ReleaseVersion::parse(input),
                Err(CliError::EmptyVersion)
            ));
        }
    }

    #[test]
    fn default_title_joins_name_and_tag() {
        let release = ReleaseVersion::parse("1.0.0").unwrap();
        let title = render_title(
            crate::bundler::DEFAULT_TITLE_TEMPLATE,
            "Git Open & Friends",
            &release,
        )
        .unwrap();
        assert_eq!(title, "Git Open & Friends v1.0.0");
    }

    #[test]
    fn unknown_template_variables_fail() {
        let release = ReleaseVersion::parse("1.0.0").unwrap();
        assert!(render_title("{{name}} {{codename}}", "Git Open", &release).is_err());
    }

    #[test]
    fn args_include_repo_only_when_configured() {
        let asset = Path::new("/work/Git Open-v1.0.0.alfredworkflow");
        let mut release = GithubRelease {
            tag: "v1.0.0",
            title: "Git Open v1.0.0",
            asset,
            repo: None,
        };
        let args: Vec<String> = release
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "release",
                "create",
                "v1.0.0",
                "/work/Git Open-v1.0.0.alfredworkflow",
                "--title",
                "Git Open v1.0.0",
                "--generate-notes",
            ]
        );

        release.repo = Some("owner/repo");
        let args = release.args();
        assert_eq!(args[args.len() - 2], "--repo");
        assert_eq!(args[args.len() - 1], "owner/repo");
    }
}
