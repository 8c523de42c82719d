//! External command execution.
//!
//! Every external step of the pipelines (opening the package, publishing a
//! release) goes through [`run`], which waits for the process and converts a
//! spawn failure or a non-zero exit into a [`crate::bundler::Error`].

use crate::bundler::error::{Error, Result};
use std::{ffi::OsStr, path::Path};

/// Captured result of a successful command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
}

/// Runs `program` with `args` in `cwd` and waits for it to finish.
///
/// # Errors
///
/// - [`Error::CommandFailed`] if the process cannot be spawned
/// - [`Error::CommandStatus`] if it exits unsuccessfully (stderr attached)
pub async fn run<I, S>(program: impl AsRef<OsStr>, args: I, cwd: &Path) -> Result<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let args: Vec<_> = args
        .into_iter()
        .map(|a| a.as_ref().to_os_string())
        .collect();
    let display = display_command(program, &args);

    log::debug!("Running: {} (in {})", display, cwd.display());

    let output = tokio::process::Command::new(program)
        .args(&args)
        .current_dir(cwd)
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(|e| Error::CommandFailed {
            command: display.clone(),
            error: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(Error::CommandStatus {
            command: display,
            status: output.status,
            stderr,
        });
    }

    if !stderr.trim().is_empty() {
        log::debug!("{} stderr: {}", display, stderr.trim());
    }

    Ok(CommandOutput { stdout })
}

/// Renders a command line for logs and error messages, quoting arguments
/// that contain whitespace.
pub fn display_command(program: &OsStr, args: &[std::ffi::OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(|a| a.as_os_str()))
        .map(|part| {
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let rendered = display_command(
            OsStr::new("gh"),
            &[
                OsString::from("release"),
                OsString::from("create"),
                OsString::from("Git Open-v1.0.alfredworkflow"),
            ],
        );
        assert_eq!(rendered, "gh release create \"Git Open-v1.0.alfredworkflow\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_carries_stderr() {
        let temp = tempfile::tempdir().unwrap();
        let err = run("sh", ["-c", "echo nope >&2; exit 3"], temp.path())
            .await
            .unwrap_err();
        match err {
            Error::CommandStatus { stderr, status, .. } => {
                assert_eq!(stderr.trim(), "nope");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_failure() {
        let temp = tempfile::tempdir().unwrap();
        let err = run("definitely-not-a-real-tool-4821", ["--help"], temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_in_requested_directory() {
        let temp = tempfile::tempdir().unwrap();
        let out = run("pwd", std::iter::empty::<&str>(), temp.path())
            .await
            .unwrap();
        let reported = std::path::PathBuf::from(out.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
