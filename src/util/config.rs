//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `<user config dir>/stargate-deb/config.toml` - user-wide defaults
//! - Project: `<source dir>/.stargate-deb/config.toml` - per-checkout overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::PackageIdentity;

/// Default `make` target that installs into `DESTDIR`.
pub const DEFAULT_INSTALL_TARGET: &str = "install_self_contained";

/// Default staging directory, relative to the source directory.
pub const DEFAULT_STAGING_DIR: &str = "tmp";

/// Packager configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Control file identity
    pub package: PackageConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Artifact settings
    pub output: OutputConfig,
}

/// Overrides for the control file identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Debian package name (default: stargate)
    pub name: Option<String>,

    /// Maintainer field
    pub maintainer: Option<String>,

    /// Description: synopsis followed by extended description lines
    pub description: Option<Vec<String>>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// PLAT_FLAGS passed to make (overridden by --plat-flags)
    pub plat_flags: Option<String>,

    /// make target that installs into DESTDIR
    pub install_target: Option<String>,

    /// Staging directory, relative to the source directory
    pub staging_dir: Option<PathBuf>,
}

/// Artifact naming configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include `<distro>-<version>` in the artifact name (default: true)
    pub include_distro: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.package.name.is_some() {
            self.package.name = other.package.name;
        }
        if other.package.maintainer.is_some() {
            self.package.maintainer = other.package.maintainer;
        }
        if other.package.description.is_some() {
            self.package.description = other.package.description;
        }

        if other.build.plat_flags.is_some() {
            self.build.plat_flags = other.build.plat_flags;
        }
        if other.build.install_target.is_some() {
            self.build.install_target = other.build.install_target;
        }
        if other.build.staging_dir.is_some() {
            self.build.staging_dir = other.build.staging_dir;
        }

        if other.output.include_distro.is_some() {
            self.output.include_distro = other.output.include_distro;
        }
    }

    /// Control file identity with defaults filled in.
    pub fn identity(&self) -> PackageIdentity {
        let mut identity = PackageIdentity::default();
        if let Some(name) = &self.package.name {
            identity.name = name.clone();
        }
        if let Some(maintainer) = &self.package.maintainer {
            identity.maintainer = maintainer.clone();
        }
        if let Some(description) = self.package.description.as_ref().filter(|d| !d.is_empty()) {
            identity.description = description.clone();
        }
        identity
    }

    /// make target for the staging install.
    pub fn install_target(&self) -> &str {
        self.build
            .install_target
            .as_deref()
            .unwrap_or(DEFAULT_INSTALL_TARGET)
    }

    /// Staging directory relative to the source directory.
    pub fn staging_dir(&self) -> &Path {
        self.build
            .staging_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_STAGING_DIR))
    }

    /// Whether distro identity is part of the artifact name.
    pub fn include_distro(&self) -> bool {
        self.output.include_distro.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.stargate-deb/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.identity(), PackageIdentity::default());
        assert_eq!(config.install_target(), "install_self_contained");
        assert_eq!(config.staging_dir(), Path::new("tmp"));
        assert!(config.include_distro());
        assert!(config.build.plat_flags.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[package]
name = "stargate-nightly"
description = ["Nightly build.", "Not for production use."]

[build]
plat_flags = "-march=armv8-a"
staging_dir = "staging"

[output]
include_distro = false
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        let identity = config.identity();
        assert_eq!(identity.name, "stargate-nightly");
        assert_eq!(identity.maintainer, "stargateaudio@noreply.github.com");
        assert_eq!(identity.description.len(), 2);
        assert_eq!(config.build.plat_flags.as_deref(), Some("-march=armv8-a"));
        assert_eq!(config.staging_dir(), Path::new("staging"));
        assert!(!config.include_distro());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.plat_flags = Some("-O2".to_string());
        base.package.maintainer = Some("a@example.com".to_string());

        let mut override_cfg = Config::default();
        override_cfg.build.plat_flags = Some("-O3".to_string());

        base.merge(override_cfg);

        assert_eq!(base.build.plat_flags.as_deref(), Some("-O3"));
        assert_eq!(base.package.maintainer.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_empty_description_uses_default() {
        let mut config = Config::default();
        config.package.description = Some(Vec::new());
        assert_eq!(
            config.identity().description,
            PackageIdentity::default().description
        );
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            "[build]\nplat_flags = \"-O2\"\ninstall_target = \"install\"\n",
        )
        .unwrap();
        std::fs::write(&project_path, "[build]\nplat_flags = \"-O3\"\n").unwrap();

        let config = load_config(Some(&global_path), &project_path);

        assert_eq!(config.build.plat_flags.as_deref(), Some("-O3"));
        assert_eq!(config.install_target(), "install");
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let project_path = tmp.path().join("config.toml");
        std::fs::write(&project_path, "[build\nplat_flags = ").unwrap();

        let config = load_config(None, &project_path);
        assert_eq!(config, Config::default());
    }
}
