//! External tool availability checking.

use crate::bundler::{Error, Result};
use std::path::PathBuf;

const GH_INSTALL_HINT: &str =
    "Install the GitHub CLI (https://cli.github.com) and run `gh auth login`.";

/// Resolves the release-hosting CLI to an executable path.
///
/// `tool` may be a bare name looked up on `PATH` or a path to an executable.
///
/// # Errors
///
/// [`Error::ToolNotFound`] when nothing executable is found.
pub fn find_release_tool(tool: &str) -> Result<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at {}", tool, path.display());
            Ok(path)
        }
        Err(e) => {
            log::debug!("{} not found: {}", tool, e);
            Err(Error::ToolNotFound {
                tool: tool.to_string(),
                hint: GH_INSTALL_HINT,
            })
        }
    }
}

/// Command that hands a file to the OS default application.
///
/// - macOS: `open <file>`
/// - Windows: `cmd /C start "" <file>`
/// - elsewhere: `xdg-open <file>`
pub fn default_opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(windows) {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_reported_with_hint() {
        let err = find_release_tool("definitely-not-gh-7731").unwrap_err();
        match err {
            Error::ToolNotFound { tool, hint } => {
                assert_eq!(tool, "definitely-not-gh-7731");
                assert!(hint.contains("cli.github.com"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn explicit_paths_must_be_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let tool = temp.path().join("gh");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_release_tool(tool.to_str().unwrap()).is_err());

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(find_release_tool(tool.to_str().unwrap()).is_ok());
    }
}
