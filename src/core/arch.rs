//! Host architecture as reported by `dpkg-architecture -q DEB_HOST_ARCH`.

use std::fmt;

use thiserror::Error;

/// Arguments passed to `dpkg-architecture` to query the host architecture.
pub const DPKG_ARCH_QUERY: [&str; 2] = ["-q", "DEB_HOST_ARCH"];

/// Errors normalizing the architecture string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchError {
    #[error("architecture query returned invalid UTF-8")]
    InvalidUtf8,

    #[error("architecture query returned an empty string")]
    Empty,
}

/// A Debian architecture name (`amd64`, `arm64`, `armhf`, ...).
///
/// The original spelling is kept for the control file and the artifact
/// name; comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostArch(String);

impl HostArch {
    /// Normalize an architecture string. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ArchError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ArchError::Empty);
        }
        Ok(HostArch(trimmed.to_string()))
    }

    /// Decode raw tool output.
    pub fn from_tool_output(stdout: &[u8]) -> Result<Self, ArchError> {
        let text = std::str::from_utf8(stdout).map_err(|_| ArchError::InvalidUtf8)?;
        Self::new(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is an ARM-family target (`arm64`, `armhf`, `armel`).
    pub fn is_arm(&self) -> bool {
        self.0.to_lowercase().starts_with("arm")
    }
}

impl fmt::Display for HostArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for HostArch {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostArch::new(s)
    }
}
