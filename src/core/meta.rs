//! Version metadata - the `version` object of `meta.json`.
//!
//! Stargate keeps its release identity in `src/meta.json`:
//!
//! ```json
//! { "version": { "major": "stargate", "minor": "23.11.3" } }
//! ```
//!
//! Both fields are free-form. Numbers are accepted and rendered the way
//! they appear in the document.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Name of the metadata file inside the source directory.
pub const META_FILE_NAME: &str = "meta.json";

/// Errors reading or interpreting `meta.json`.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("failed to read version metadata: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("version metadata is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("version metadata is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("`{field}` must be a non-empty string or a number, found {found}")]
    InvalidField { field: &'static str, found: String },
}

/// Release version read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMeta {
    major: String,
    minor: String,
}

impl VersionMeta {
    /// Create version metadata directly.
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        VersionMeta {
            major: major.into(),
            minor: minor.into(),
        }
    }

    /// Load `meta.json` from a path.
    pub fn load(path: &Path) -> Result<Self, MetaError> {
        let contents = std::fs::read_to_string(path).map_err(|source| MetaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    /// The major field (Stargate uses the product name here).
    pub fn major(&self) -> &str {
        &self.major
    }

    /// The minor field, used as the Debian `Version`.
    pub fn minor(&self) -> &str {
        &self.minor
    }
}

impl std::str::FromStr for VersionMeta {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let doc: Value = serde_json::from_str(s)?;
        let version = doc
            .get("version")
            .ok_or(MetaError::MissingField { field: "version" })?;

        Ok(VersionMeta {
            major: version_field(version, "major", "version.major")?,
            minor: version_field(version, "minor", "version.minor")?,
        })
    }
}

impl fmt::Display for VersionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.major, self.minor)
    }
}

fn version_field(version: &Value, key: &str, field: &'static str) -> Result<String, MetaError> {
    match version.get(key) {
        None => Err(MetaError::MissingField { field }),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(MetaError::InvalidField {
            field,
            found: describe(other),
        }),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{}`", b),
        Value::String(_) => "an empty string".to_string(),
        Value::Number(n) => format!("number `{}`", n),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_string_fields() {
        let meta: VersionMeta = r#"{"version": {"major": "stargate", "minor": "23.11.3"}}"#
            .parse()
            .unwrap();
        assert_eq!(meta.major(), "stargate");
        assert_eq!(meta.minor(), "23.11.3");
        assert_eq!(meta.to_string(), "stargate-23.11.3");
    }

    #[test]
    fn test_parse_numeric_fields() {
        let meta: VersionMeta = r#"{"version": {"major": 23, "minor": 11}, "other": true}"#
            .parse()
            .unwrap();
        assert_eq!(meta.major(), "23");
        assert_eq!(meta.minor(), "11");
    }

    #[test]
    fn test_missing_version_object() {
        let err = "{}".parse::<VersionMeta>().unwrap_err();
        assert!(matches!(err, MetaError::MissingField { field: "version" }));
    }

    #[test]
    fn test_missing_minor() {
        let err = r#"{"version": {"major": "stargate"}}"#
            .parse::<VersionMeta>()
            .unwrap_err();
        assert!(matches!(
            err,
            MetaError::MissingField {
                field: "version.minor"
            }
        ));
    }

    #[test]
    fn test_invalid_field_type() {
        let err = r#"{"version": {"major": null, "minor": "1"}}"#
            .parse::<VersionMeta>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "`version.major` must be a non-empty string or a number, found null"
        );

        let err = r#"{"version": {"major": "a", "minor": ""}}"#
            .parse::<VersionMeta>()
            .unwrap_err();
        assert!(matches!(err, MetaError::InvalidField { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = r#"{"version": "#.parse::<VersionMeta>().unwrap_err();
        assert!(matches!(err, MetaError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = VersionMeta::load(&tmp.path().join(META_FILE_NAME)).unwrap_err();
        assert!(matches!(err, MetaError::Read { .. }));
        assert!(err.to_string().contains("meta.json"));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(META_FILE_NAME);
        std::fs::write(&path, r#"{"version": {"major": "stargate", "minor": "1.2"}}"#).unwrap();

        assert_eq!(
            VersionMeta::load(&path).unwrap(),
            VersionMeta::new("stargate", "1.2")
        );
    }
}
