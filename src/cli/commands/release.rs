//! Release publishing: build a versioned package and create a GitHub release.

use super::install::report_package;
use crate::bundler::{
    Bundler, PackageRequest, Pipeline, PipelineStage, find_release_tool,
};
use crate::cli::{Args, OutputManager, ReleaseArgs, RuntimeConfig};
use crate::error::Result;
use crate::metadata::load_project;
use crate::publish::{GithubRelease, ReleaseVersion, render_title};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Publishes `<name>-v<version>.alfredworkflow` as release `v<version>`.
///
/// Order of checks: release tool, version input, metadata file. The build
/// directory and the local package are removed on every exit path.
pub async fn release(args: &Args, release: &ReleaseArgs, runtime: &RuntimeConfig) -> Result<i32> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    release_with_input(args, release, runtime, &mut stdin).await
}

/// [`release`] reading the version prompt from `input`.
pub async fn release_with_input<R>(
    args: &Args,
    release: &ReleaseArgs,
    runtime: &RuntimeConfig,
    input: &mut R,
) -> Result<i32>
where
    R: AsyncBufRead + Unpin,
{
    let mut pipeline = Pipeline::new("release");
    pipeline.enter(PipelineStage::Validating)?;

    let tool_name = release.tool();
    let tool = find_release_tool(tool_name).map_err(|e| pipeline.fail(e))?;

    let root = args.project_root()?;
    let project = load_project(&root, args.config.as_deref()).map_err(|e| pipeline.fail(e))?;

    let raw_version = match &release.release_version {
        Some(version) => version.clone(),
        None => prompt_version(input, runtime.output(), project.current_version())
            .await
            .map_err(|e| pipeline.fail(e))?,
    };
    let version = ReleaseVersion::parse(&raw_version).map_err(|e| pipeline.fail(e))?;

    let settings = project
        .resolve(&args.overrides())
        .map_err(|e| pipeline.fail(e))?;
    let title = render_title(settings.title_template(), settings.workflow_name(), &version)
        .map_err(|e| pipeline.fail(e))?;

    runtime.section(&format!("Releasing {} {}", settings.workflow_name(), version.tag))?;
    let bundler = Bundler::new(settings);
    let packaged = bundler
        .package(
            &mut pipeline,
            &PackageRequest::release(&version.version, &version.tag),
        )
        .await?;
    report_package(runtime, &packaged)?;

    pipeline.enter(PipelineStage::Finalizing)?;
    let github_release = GithubRelease {
        tag: &version.tag,
        title: &title,
        asset: &packaged.path,
        repo: bundler.settings().release_repo_id(),
    };
    runtime.progress(&format!("Creating release {} ({})", version.tag, title))?;
    let url = match github_release
        .create(&tool, bundler.settings().project_root())
        .await
    {
        Ok(url) => url,
        Err(e) => {
            runtime.warn(&format!(
                "Release {} may be partially created; inspect it with `{} release view {}`",
                version.tag, tool_name, version.tag
            ))?;
            return Err(pipeline.fail(e).into());
        }
    };

    pipeline.enter(PipelineStage::CleanedUp)?;
    packaged.clean_up().await?;

    if url.is_empty() {
        runtime.success(&format!("Published {}", version.tag))?;
    } else {
        runtime.success(&format!("Published {} at {}", version.tag, url))?;
    }
    Ok(0)
}

/// Asks for the release version on `input`.
///
/// End of input reads as an empty answer.
pub async fn prompt_version<R>(
    input: &mut R,
    output: &OutputManager,
    current: Option<&str>,
) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let prompt = match current {
        Some(current) => format!("Version to release (info.plist has {current}): "),
        None => "Version to release: ".to_string(),
    };
    output.prompt(&prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}
