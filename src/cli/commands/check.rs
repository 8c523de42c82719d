//! Read-only project validation.

use crate::bundler::collect::{collect_files, ensure_metadata};
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::metadata::{inspect_variables, load_project};

/// Validates the project without writing anything.
///
/// Fails on the same preconditions packaging would fail on; problems with
/// workflow variables are reported as warnings.
pub async fn check(args: &Args, runtime: &RuntimeConfig) -> Result<i32> {
    let root = args.project_root()?;
    let project = load_project(&root, args.config.as_deref())?;
    let settings = project.resolve(&args.overrides())?;

    ensure_metadata(&settings)?;
    let files = collect_files(&settings)?;

    runtime.section(&format!("{} ({})", settings.workflow_name(), root.display()))?;
    if let Some(info) = &project.info {
        if let Some(bundle_id) = &info.bundle_id {
            runtime.indent(&format!("bundle id: {bundle_id}"))?;
        }
        runtime.indent(&format!(
            "version:   {}",
            info.version.as_deref().unwrap_or("(not set)")
        ))?;
    }
    runtime.indent(&format!("package:   {}", settings.package_file_name(None)))?;
    if let Some(repo) = settings.release_repo_id() {
        runtime.indent(&format!("releases:  {repo}"))?;
    }

    runtime.section(&format!("Files ({})", files.len()))?;
    for file in &files {
        let relative = file
            .source
            .strip_prefix(settings.project_root())
            .unwrap_or(&file.source);
        if relative.as_os_str() == file.name.as_str() {
            runtime.indent(&file.name)?;
        } else {
            runtime.indent(&format!("{} <- {}", file.name, relative.display()))?;
        }
    }

    runtime.section("Workflow variables")?;
    let reports = inspect_variables(project.info.as_ref().unwrap_or(&Default::default()));
    for report in &reports {
        match &report.value {
            Some(value) => runtime.indent(&format!(
                "{} = {}: {}",
                report.name, value, report.description
            ))?,
            None => runtime.indent(&format!(
                "{} (default: {}): {}",
                report.name, report.effective, report.description
            ))?,
        }
        if let Some(issue) = &report.issue {
            runtime.warn(&format!("{}: {}", report.name, issue))?;
        }
    }

    runtime.success("Project is ready to package")?;
    Ok(0)
}
