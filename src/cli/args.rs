//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap,
//! with validation and conversion into settings overrides.

use crate::bundler::DEFAULT_RELEASE_TOOL;
use crate::metadata::SettingsOverrides;
use clap::{Args as ClapArgs, Parser, Subcommand};
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Alfred workflow packager and release publisher
#[derive(Parser, Debug)]
#[command(
    name = "alfred_workflow_bundler",
    version,
    about = "Package Alfred workflows and publish them as GitHub releases",
    long_about = "Packages an Alfred workflow project (scripts, info.plist, icon, readme) into a
.alfredworkflow archive.

Usage:
  alfred_workflow_bundler install              # package and open in Alfred
  alfred_workflow_bundler release              # prompt for a version, publish with gh
  alfred_workflow_bundler release --release-version 1.2.0 --repo owner/repo
  alfred_workflow_bundler check                # validate without writing anything

Settings come from flags and environment variables, then workflow.toml in the
project root, then the name key of info.plist."
)]
pub struct Args {
    /// Workflow project root
    #[arg(short = 'C', long, global = true, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Workflow name (defaults to workflow.toml, then info.plist)
    #[arg(short, long, global = true, value_name = "NAME", env = "WORKFLOW_NAME")]
    pub name: Option<String>,

    /// Build directory, relative to the project root
    #[arg(long, global = true, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Configuration file (defaults to workflow.toml in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print detailed progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package the workflow and open it with the OS default handler
    Install(InstallArgs),

    /// Package the workflow and publish it as a tagged GitHub release
    Release(ReleaseArgs),

    /// Validate the project and list what would be packaged
    Check,
}

/// Options for `install`
#[derive(ClapArgs, Debug, Default)]
pub struct InstallArgs {
    /// Leave the package in the project root instead of opening it
    #[arg(long)]
    pub no_open: bool,

    /// Command used to open the package, e.g. `open -a Alfred`; the package path is appended
    #[arg(long, value_name = "CMD", env = "WORKFLOW_OPENER")]
    pub opener: Option<String>,
}

/// Options for `release`
#[derive(ClapArgs, Debug, Default)]
pub struct ReleaseArgs {
    /// Release version; prompted for when omitted
    #[arg(long, value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Repository to release to (owner/repo or GitHub URL)
    #[arg(long, value_name = "REPO", env = "WORKFLOW_RELEASE_REPO")]
    pub repo: Option<String>,

    /// Release tool executable
    #[arg(long = "gh", value_name = "PATH", env = "WORKFLOW_GH_BIN")]
    pub gh: Option<String>,
}

impl ReleaseArgs {
    /// Release tool to look up: `--gh`, `WORKFLOW_GH_BIN`, or `gh`.
    pub fn tool(&self) -> &str {
        self.gh.as_deref().unwrap_or(DEFAULT_RELEASE_TOOL)
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.project_dir.as_os_str().is_empty() {
            return Err("Project directory cannot be empty".to_string());
        }
        if !self.project_dir.is_dir() {
            return Err(format!(
                "Project directory does not exist: {}",
                self.project_dir.display()
            ));
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("Workflow name cannot be empty".to_string());
        }
        if matches!(
            &self.command,
            Command::Install(InstallArgs { opener: Some(opener), .. }) if opener.trim().is_empty()
        ) {
            return Err("Opener cannot be empty".to_string());
        }
        Ok(())
    }

    /// Absolute project root
    pub fn project_root(&self) -> std::io::Result<PathBuf> {
        Ok(self.project_dir.absolutize()?.into_owned())
    }

    /// Settings overrides carried by these arguments
    pub fn overrides(&self) -> SettingsOverrides {
        let mut overrides = SettingsOverrides {
            workflow_name: self.name.clone(),
            build_dir: self.build_dir.clone(),
            ..Default::default()
        };
        match &self.command {
            Command::Install(install) => overrides.opener = install.opener.clone(),
            Command::Release(release) => overrides.release_repo_id = release.repo.clone(),
            Command::Check => {}
        }
        overrides
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn release_flags_become_overrides() {
        let args = Args::try_parse_from([
            "alfred_workflow_bundler",
            "release",
            "--release-version",
            "1.0.0",
            "--repo",
            "owner/repo",
            "--gh",
            "/opt/bin/gh",
            "--name",
            "Git Open",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.workflow_name.as_deref(), Some("Git Open"));
        assert_eq!(overrides.release_repo_id.as_deref(), Some("owner/repo"));
        match args.command {
            Command::Release(release) => {
                assert_eq!(release.release_version.as_deref(), Some("1.0.0"));
                assert_eq!(release.tool(), "/opt/bin/gh");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn release_tool_defaults_to_gh() {
        let release = ReleaseArgs::default();
        assert_eq!(release.tool(), "gh");
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["alfred_workflow_bundler", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn blank_opener_fails_validation() {
        let args =
            Args::try_parse_from(["alfred_workflow_bundler", "install", "--opener", "  "]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn blank_name_fails_validation() {
        let args =
            Args::try_parse_from(["alfred_workflow_bundler", "--name", " ", "check"]).unwrap();
        assert!(args.validate().is_err());
    }
}
