//! Distro identity from `os-release`, used to tag the artifact name.

use std::collections::HashMap;
use std::path::Path;

/// Locations searched for `os-release`, in order.
pub const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Short distro name and version, already normalized for file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroInfo {
    /// First word of `NAME`, lower-cased (`ubuntu`, `debian`).
    pub name: String,
    /// `VERSION_ID` (or `VERSION`), lower-cased, spaces replaced by `-`.
    pub version: String,
}

impl DistroInfo {
    /// Detect from the first usable file among `paths`.
    ///
    /// Returns `None` when the distro cannot be identified.
    pub fn detect_from<P: AsRef<Path>>(paths: &[P]) -> Option<Self> {
        paths
            .iter()
            .find_map(|path| Self::from_os_release_file(path.as_ref()))
    }

    /// Read an `os-release` file.
    pub fn from_os_release_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let info = Self::parse_os_release(&contents);
        if info.is_none() {
            tracing::debug!("no usable distro identity in {}", path.display());
        }
        info
    }

    /// Parse `os-release` contents.
    pub fn parse_os_release(contents: &str) -> Option<Self> {
        let fields = parse_fields(contents);

        let name = fields
            .get("NAME")
            .and_then(|n| n.split_whitespace().next())
            .map(|n| n.to_lowercase())?;

        let version = fields
            .get("VERSION_ID")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| fields.get("VERSION"))
            .map(|v| v.trim().to_lowercase().replace(' ', "-"))
            .filter(|v| !v.is_empty())?;

        Some(DistroInfo { name, version })
    }
}

fn parse_fields(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim())))
        .collect()
}

fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));

    if !quoted {
        return value.to_string();
    }

    let inner = &value[1..value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
