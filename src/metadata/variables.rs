//! Workflow environment variables.
//!
//! Alfred exports the `variables` dictionary of `info.plist` to the
//! workflow's scripts as environment variables. The scripts read the ones
//! listed in [`KNOWN_VARIABLES`] and fall back to built-in defaults when a
//! variable is unset or empty.

use super::WorkflowInfo;

/// A variable the workflow scripts read, with the default they fall back to.
#[derive(Debug, Clone, Copy)]
pub struct KnownVariable {
    /// Variable name
    pub name: &'static str,
    /// Fallback the scripts use when it is unset
    pub default: &'static str,
    /// One-line description
    pub description: &'static str,
}

/// Variables consumed by the workflow scripts.
pub const KNOWN_VARIABLES: &[KnownVariable] = &[
    KnownVariable {
        name: "WORKSPACE_DIR",
        default: "~/workspace",
        description: "root directory searched for local repositories",
    },
    KnownVariable {
        name: "MAX_DEPTH",
        default: "3",
        description: "directory depth searched below WORKSPACE_DIR",
    },
    KnownVariable {
        name: "IDES_TO_CHECK",
        default: "Visual Studio Code, Cursor, GoLand, Rider, WebStorm, IntelliJ IDEA",
        description: "comma-separated IDEs offered when opening a repository",
    },
    KnownVariable {
        name: "APP_SEARCH_PATHS",
        default: "/Applications, ~/Applications",
        description: "comma-separated directories searched for IDE applications",
    },
];

/// Findings for one known variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReport {
    /// Variable name
    pub name: &'static str,
    /// What the scripts use it for
    pub description: &'static str,
    /// Value set in `info.plist`, if non-empty
    pub value: Option<String>,
    /// Value the scripts will actually use
    pub effective: String,
    /// Problem with the configured value
    pub issue: Option<String>,
}

/// Reports how each known variable is configured in `info`.
pub fn inspect_variables(info: &WorkflowInfo) -> Vec<VariableReport> {
    KNOWN_VARIABLES
        .iter()
        .map(|known| {
            let value = info
                .variables
                .get(known.name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());

            let issue = match (known.name, value.as_deref()) {
                ("MAX_DEPTH", Some(v)) if v.parse::<u32>().is_err() => Some(format!(
                    "'{v}' is not a non-negative integer; scripts fall back to {}",
                    known.default
                )),
                ("IDES_TO_CHECK" | "APP_SEARCH_PATHS", Some(v))
                    if v.split(',').all(|item| item.trim().is_empty()) =>
                {
                    Some("list has no entries; scripts fall back to the defaults".to_string())
                }
                _ => None,
            };

            let effective = match (&value, &issue) {
                (Some(v), None) => v.clone(),
                _ => known.default.to_string(),
            };

            VariableReport {
                name: known.name,
                description: known.description,
                value,
                effective,
                issue,
            }
        })
        .collect()
}
