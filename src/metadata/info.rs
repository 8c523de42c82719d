//! Alfred `info.plist` access.

use crate::bundler::error::{ErrorExt, Result as BundlerResult};
use crate::error::Result;
use plist::{Dictionary, Value};
use std::{collections::BTreeMap, path::Path};

/// Fields of an Alfred `info.plist` the packager cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowInfo {
    /// `name` key: the workflow's display name
    pub name: Option<String>,

    /// `version` key
    pub version: Option<String>,

    /// `bundleid` key
    pub bundle_id: Option<String>,

    /// `variables` dictionary (string values only)
    pub variables: BTreeMap<String, String>,
}

/// Reads workflow metadata from an `info.plist`.
///
/// Empty strings are treated as absent.
pub fn read_workflow_info(path: &Path) -> Result<WorkflowInfo> {
    let value = Value::from_file(path)?;
    let dict = value.as_dictionary().ok_or_else(|| {
        crate::bundler::Error::GenericError(format!(
            "{} is not a property list dictionary",
            path.display()
        ))
    })?;

    let variables = dict
        .get("variables")
        .and_then(Value::as_dictionary)
        .map(|vars| {
            vars.iter()
                .filter_map(|(key, value)| scalar_string(value).map(|v| (key.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    Ok(WorkflowInfo {
        name: non_empty(dict, "name"),
        version: non_empty(dict, "version"),
        bundle_id: non_empty(dict, "bundleid"),
        variables,
    })
}

/// Sets the `version` key of the plist at `path`, rewriting it as XML.
///
/// Used on the staged copy only; the project's own `info.plist` is left alone.
pub fn stamp_version(path: &Path, version: &str) -> BundlerResult<()> {
    let mut value = Value::from_file(path)?;
    let dict = value.as_dictionary_mut().ok_or_else(|| {
        crate::bundler::Error::GenericError(format!(
            "{} is not a property list dictionary",
            path.display()
        ))
    })?;
    dict.insert("version".to_string(), Value::String(version.to_string()));

    let mut buffer = Vec::new();
    value.to_writer_xml(&mut buffer)?;
    std::fs::write(path, buffer).fs_context("writing stamped plist", path)?;

    log::debug!("Stamped version {} into {}", version, path.display());
    Ok(())
}

fn non_empty(dict: &Dictionary, key: &str) -> Option<String> {
    dict.get(key)
        .and_then(Value::as_string)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => i
            .as_signed()
            .map(|v| v.to_string())
            .or_else(|| i.as_unsigned().map(|v| v.to_string())),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Real(r) => Some(r.to_string()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::PackagerError;

    pub(crate) const SAMPLE_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>bundleid</key>
	<string>com.example.gitopen</string>
	<key>name</key>
	<string>Git Open</string>
	<key>variables</key>
	<dict>
		<key>MAX_DEPTH</key>
		<string>3</string>
		<key>WORKSPACE_DIR</key>
		<string>~/workspace</string>
	</dict>
	<key>version</key>
	<string>1.4.0</string>
</dict>
</plist>
"#;

    #[test]
    fn reads_name_version_and_variables() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("info.plist");
        std::fs::write(&path, SAMPLE_PLIST).unwrap();

        let info = read_workflow_info(&path).unwrap();

        assert_eq!(info.name.as_deref(), Some("Git Open"));
        assert_eq!(info.version.as_deref(), Some("1.4.0"));
        assert_eq!(info.bundle_id.as_deref(), Some("com.example.gitopen"));
        assert_eq!(info.variables.get("MAX_DEPTH").map(String::as_str), Some("3"));
        assert_eq!(info.variables.len(), 2);
    }

    #[test]
    fn blank_name_reads_as_absent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("info.plist");
        std::fs::write(&path, SAMPLE_PLIST.replace("Git Open", "  ")).unwrap();

        assert_eq!(read_workflow_info(&path).unwrap().name, None);
    }

    #[test]
    fn garbage_is_a_plist_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("info.plist");
        std::fs::write(&path, "<plist><dict><key>name</key>").unwrap();

        assert!(matches!(
            read_workflow_info(&path),
            Err(PackagerError::Plist(_))
        ));
    }

    #[test]
    fn non_dictionary_root_is_reported_as_such() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("info.plist");
        std::fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?><plist version="1.0"><array/></plist>"#,
        )
        .unwrap();

        let err = read_workflow_info(&path).unwrap_err();
        assert!(matches!(
            err,
            PackagerError::Bundler(crate::bundler::Error::GenericError(_))
        ));
        assert!(err.to_string().ends_with("is not a property list dictionary"));
    }

    #[test]
    fn stamping_replaces_version_only() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("info.plist");
        std::fs::write(&path, SAMPLE_PLIST).unwrap();

        stamp_version(&path, "2.0.0").unwrap();

        let info = read_workflow_info(&path).unwrap();
        assert_eq!(info.version.as_deref(), Some("2.0.0"));
        assert_eq!(info.name.as_deref(), Some("Git Open"));
        assert_eq!(info.variables.len(), 2);
    }
}
