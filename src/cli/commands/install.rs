//! Local packaging: build the package and hand it to the OS.

use crate::bundler::{
    Bundler, PackageRequest, PackagedWorkflow, Pipeline, PipelineStage, default_opener,
    utils::process,
};
use crate::cli::{Args, InstallArgs, RuntimeConfig};
use crate::error::Result;
use crate::metadata::load_project;
use std::{ffi::OsString, path::Path};

/// Packages the workflow into `<name>.alfredworkflow` and opens it.
///
/// The build directory is removed on every exit path; the package stays in
/// the project root.
pub async fn install(args: &Args, install: &InstallArgs, runtime: &RuntimeConfig) -> Result<i32> {
    let mut pipeline = Pipeline::new("install");
    pipeline.enter(PipelineStage::Validating)?;

    let root = args.project_root()?;
    let project = load_project(&root, args.config.as_deref()).map_err(|e| pipeline.fail(e))?;
    let settings = project
        .resolve(&args.overrides())
        .map_err(|e| pipeline.fail(e))?;

    runtime.section(&format!("Packaging {}", settings.workflow_name()))?;
    let bundler = Bundler::new(settings);
    let packaged = bundler
        .package(&mut pipeline, &PackageRequest::install())
        .await?;
    report_package(runtime, &packaged)?;

    pipeline.enter(PipelineStage::Finalizing)?;
    if install.no_open {
        runtime.verbose_println("Skipping open (--no-open)")?;
    } else {
        runtime.progress(&format!("Opening {}", display_name(&packaged.path)))?;
        open_package(bundler.settings().opener(), &packaged.path, bundler.settings().project_root())
            .await
            .map_err(|e| pipeline.fail(e))?;
    }

    pipeline.enter(PipelineStage::CleanedUp)?;
    let path = packaged.path.clone();
    packaged.clean_up().await?;

    runtime.success(&format!("Packaged {}", path.display()))?;
    Ok(0)
}

/// Runs the opener (override or platform default) on `package`.
async fn open_package(
    opener: Option<&str>,
    package: &Path,
    cwd: &Path,
) -> crate::bundler::Result<()> {
    let (program, mut command_args) = match opener {
        Some(cmd) => split_opener(cmd),
        None => {
            let (program, args) = default_opener();
            (program.to_string(), args.iter().map(|a| (*a).into()).collect())
        }
    };
    command_args.push(package.as_os_str().to_os_string());

    process::run(program, command_args, cwd).await?;
    Ok(())
}

/// Splits an opener override such as `open -a Alfred` into program and
/// arguments. A value naming an existing file is used whole, so executables
/// with spaces in their path still work.
fn split_opener(opener: &str) -> (String, Vec<OsString>) {
    if Path::new(opener).is_file() {
        return (opener.to_string(), Vec::new());
    }
    let mut parts = opener.split_whitespace();
    let program = parts.next().unwrap_or_default().to_string();
    (program, parts.map(OsString::from).collect())
}

/// Prints the package summary shared by install and release.
pub(super) fn report_package(runtime: &RuntimeConfig, packaged: &PackagedWorkflow) -> Result<()> {
    runtime.progress(&format!(
        "Wrote {} ({} bytes)",
        display_name(&packaged.path),
        packaged.size
    ))?;
    runtime.indent(&format!("sha256 {}", packaged.checksum))?;
    for entry in &packaged.entries {
        runtime.verbose_println(&format!("    {entry}"))?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_with_arguments_is_split() {
        let (program, args) = split_opener("open -a Alfred");
        assert_eq!(program, "open");
        assert_eq!(args, [OsString::from("-a"), OsString::from("Alfred")]);
    }

    #[test]
    fn existing_file_is_used_whole() {
        let temp = tempfile::tempdir().unwrap();
        let opener = temp.path().join("my opener");
        std::fs::write(&opener, "").unwrap();

        let (program, args) = split_opener(opener.to_str().unwrap());
        assert_eq!(Path::new(&program), opener);
        assert!(args.is_empty());
    }
}
