//! File manifest patterns.

use serde::Deserialize;

/// A glob pattern selecting files for the workflow package.
///
/// Patterns are resolved relative to the project root. A required pattern
/// must match at least one regular file; an optional one may match nothing.
///
/// # Examples
///
/// ```
/// use alfred_workflow_bundler::bundler::ManifestPattern;
///
/// let scripts = ManifestPattern::required("*.py");
/// let readme = ManifestPattern::optional("README.md");
/// assert!(scripts.required);
/// assert!(!readme.required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestPattern {
    /// Glob pattern, e.g. `*.py` or `icon.png`.
    pub pattern: String,

    /// Whether an empty match is an error.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ManifestPattern {
    /// Pattern that must match at least one file.
    pub fn required(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            required: true,
        }
    }

    /// Pattern that may match nothing.
    pub fn optional(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            required: false,
        }
    }
}

/// Default manifest of an Alfred workflow project: every script, the
/// metadata file, the icon, and the readme when there is one.
pub fn default_manifest(metadata_file: &str) -> Vec<ManifestPattern> {
    vec![
        ManifestPattern::required("*.py"),
        ManifestPattern::required(metadata_file),
        ManifestPattern::required("icon.png"),
        ManifestPattern::optional("README.md"),
    ]
}
