//! Global context for packaging operations.
//!
//! Provides centralized access to the source directory, configuration
//! paths and the staging layout.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;

use crate::core::distro::OS_RELEASE_PATHS;
use crate::core::{DistroInfo, META_FILE_NAME};
use crate::util::config::{load_config, Config};

/// Project directories for stargate-deb
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("", "", "stargate-deb"));

/// Name of the per-checkout configuration directory.
pub const PROJECT_CONFIG_DIR: &str = ".stargate-deb";

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Stargate `src/` directory holding the Makefile and meta.json
    source_dir: PathBuf,

    /// Global configuration file, if the platform has a config dir
    global_config: Option<PathBuf>,

    /// `os-release` locations searched for the distro identity
    os_release_paths: Vec<PathBuf>,
}

impl GlobalContext {
    /// Create a context rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let global_config = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().join("config.toml"));

        Ok(GlobalContext {
            source_dir: cwd.clone(),
            cwd,
            global_config,
            os_release_paths: OS_RELEASE_PATHS.iter().map(PathBuf::from).collect(),
        })
    }

    /// Create a context for an explicit source directory.
    ///
    /// Relative paths are resolved against the current directory.
    pub fn with_source_dir(source_dir: impl AsRef<Path>) -> Result<Self> {
        let mut ctx = Self::new()?;
        let source_dir = source_dir.as_ref();
        ctx.source_dir = if source_dir.is_absolute() {
            source_dir.to_path_buf()
        } else {
            ctx.cwd.join(source_dir)
        };
        Ok(ctx)
    }

    /// Override the global config location.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Override the `os-release` search path.
    pub fn with_os_release_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.os_release_paths = paths;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Path to `meta.json`.
    pub fn meta_path(&self) -> PathBuf {
        self.source_dir.join(META_FILE_NAME)
    }

    /// Global config path.
    pub fn global_config_path(&self) -> Option<&Path> {
        self.global_config.as_deref()
    }

    /// Project config path (`.stargate-deb/config.toml`).
    pub fn project_config_path(&self) -> PathBuf {
        self.source_dir.join(PROJECT_CONFIG_DIR).join("config.toml")
    }

    /// Load merged configuration for this source directory.
    pub fn load_config(&self) -> Config {
        load_config(self.global_config_path(), &self.project_config_path())
    }

    /// Detect the distro from the first readable `os-release`.
    pub fn detect_distro(&self) -> Option<DistroInfo> {
        DistroInfo::detect_from(&self.os_release_paths)
    }

    /// Staging directory for a configuration.
    ///
    /// The staging directory is wiped on every build, so it must be a
    /// strict subdirectory of the source directory.
    pub fn staging_dir(&self, config: &Config) -> Result<PathBuf> {
        let relative = config.staging_dir();
        let is_subdir = relative.components().next().is_some()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_subdir {
            bail!(
                "staging directory `{}` must be a relative path below the source directory",
                relative.display()
            );
        }
        Ok(self.source_dir.join(relative))
    }

    /// Where `dpkg-deb --build <staging>` writes its output.
    pub fn staging_deb_path(&self, config: &Config) -> Result<PathBuf> {
        let staging = self.staging_dir(config)?;
        let mut name = staging
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".deb");
        Ok(staging.with_file_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert_eq!(ctx.source_dir(), ctx.cwd());
    }

    #[test]
    fn test_relative_source_dir() {
        let ctx = GlobalContext::with_source_dir("stargate/src").unwrap();
        assert!(ctx.source_dir().is_absolute());
        assert!(ctx.source_dir().ends_with("stargate/src"));
        assert!(ctx.meta_path().ends_with("stargate/src/meta.json"));
    }

    #[test]
    fn test_staging_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_source_dir(tmp.path()).unwrap();
        let mut config = Config::default();

        assert_eq!(ctx.staging_dir(&config).unwrap(), tmp.path().join("tmp"));
        assert_eq!(
            ctx.staging_deb_path(&config).unwrap(),
            tmp.path().join("tmp.deb")
        );

        config.build.staging_dir = Some(PathBuf::from("build/stage"));
        assert_eq!(
            ctx.staging_deb_path(&config).unwrap(),
            tmp.path().join("build/stage.deb")
        );
    }

    #[test]
    fn test_staging_dir_must_stay_below_source() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_source_dir(tmp.path()).unwrap();
        let mut config = Config::default();

        for bad in ["", ".", "..", "./", "tmp/..", "../tmp", "/", "/tmp/stage"] {
            config.build.staging_dir = Some(PathBuf::from(bad));
            let err = ctx.staging_dir(&config).unwrap_err();
            assert!(
                err.to_string().contains("must be a relative path"),
                "{bad:?} was accepted"
            );
            assert!(ctx.staging_deb_path(&config).is_err());
        }
    }

    #[test]
    fn test_detect_distro_uses_configured_paths() {
        let tmp = TempDir::new().unwrap();
        let os_release = tmp.path().join("os-release");
        std::fs::write(&os_release, "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\n").unwrap();

        let ctx = GlobalContext::with_source_dir(tmp.path())
            .unwrap()
            .with_os_release_paths(vec![tmp.path().join("missing"), os_release]);
        let distro = ctx.detect_distro().unwrap();
        assert_eq!(distro.name, "ubuntu");
        assert_eq!(distro.version, "22.04");

        let ctx = ctx.with_os_release_paths(Vec::new());
        assert!(ctx.detect_distro().is_none());
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let config_dir = tmp.path().join(PROJECT_CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[package]\nname = \"stargate-dev\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_source_dir(tmp.path())
            .unwrap()
            .with_global_config(None);
        assert_eq!(ctx.load_config().identity().name, "stargate-dev");
    }
}
