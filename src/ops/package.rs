//! Implementation of `stargate-deb build`.
//!
//! The pipeline is strictly sequential and fails fast: the first external
//! command that exits non-zero aborts the run and the staging directory is
//! left as-is for inspection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::arch::DPKG_ARCH_QUERY;
use crate::core::{
    package_file_name, DebianMetadata, DependencySet, HostArch, VersionMeta,
};
use crate::util::fs::{
    ensure_dir, remove_dir_all_if_exists, remove_files_with_extension, write_executable,
    write_string,
};
use crate::util::shell::Status;
use crate::util::{Config, Executor, GlobalContext, ProcessBuilder, Shell};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Install the package with apt after creating it
    pub install: bool,

    /// Non-default PLAT_FLAGS for make (overrides config)
    pub plat_flags: Option<String>,
}

/// Outcome of a packaging run.
#[derive(Debug, Clone)]
pub struct PackageResult {
    /// Final location of the renamed artifact
    pub package_path: PathBuf,

    /// Exit code of `apt install`, when `--install` was requested
    pub install_code: Option<i32>,
}

impl PackageResult {
    /// Process exit code for this run: apt's code, or 0.
    pub fn exit_code(&self) -> i32 {
        self.install_code.unwrap_or(0)
    }
}

/// Build the native tree, stage it, and produce the `.deb`.
pub fn package(
    ctx: &GlobalContext,
    config: &Config,
    opts: &PackageOptions,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<PackageResult> {
    // Metadata is read before any external command is spawned.
    let meta_path = ctx.meta_path();
    let version = VersionMeta::load(&meta_path)?;
    debug!("version {} from {}", version, meta_path.display());

    let staging = ctx.staging_dir(config)?;

    if opts.install {
        // Warm up sudo so the password prompt comes before the build.
        exec.run_checked(&ProcessBuilder::new("sudo").arg("true"))
            .context("failed to obtain sudo credentials")?;
    }

    remove_dir_all_if_exists(&staging)?;
    ensure_dir(&staging)?;

    let arch = query_host_arch(exec)?;
    info!("host architecture: {}", arch);

    let deps = DependencySet::for_arch(&arch);
    let metadata = DebianMetadata::generate(&config.identity(), &version, &arch, &deps);

    let plat_flags = opts
        .plat_flags
        .as_deref()
        .or(config.build.plat_flags.as_deref());
    run_make(ctx, plat_flags, exec, shell)?;
    stage_install(ctx, config, &staging, exec, shell)?;

    let removed = remove_files_with_extension(&staging, "pyc")?;
    debug!("removed {} bytecode files from staging", removed);

    write_debian_dir(&staging, &metadata)?;

    let built = build_deb(ctx, config, &staging, exec, shell)?;

    let distro = if config.include_distro() {
        ctx.detect_distro()
    } else {
        None
    };
    if config.include_distro() && distro.is_none() {
        shell.warn("could not detect the distro; leaving it out of the package name");
    }

    let package_name = package_file_name(&version, distro.as_ref(), &arch);
    let package_path = ctx.source_dir().join(&package_name);
    std::fs::rename(&built, &package_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            built.display(),
            package_path.display()
        )
    })?;
    shell.status(Status::Created, package_path.display());

    let install_code = if opts.install {
        Some(install_package(ctx, &package_name, exec, shell)?)
    } else {
        None
    };

    Ok(PackageResult {
        package_path,
        install_code,
    })
}

/// Query the host architecture with `dpkg-architecture`.
pub fn query_host_arch(exec: &mut dyn Executor) -> Result<HostArch> {
    let cmd = ProcessBuilder::new("dpkg-architecture").args(DPKG_ARCH_QUERY);
    let outcome = exec
        .capture_checked(&cmd)
        .context("failed to query the host architecture")?;
    Ok(HostArch::from_tool_output(&outcome.stdout)?)
}

/// Render the `DEBIAN/` files without building anything.
///
/// The architecture is queried from the host unless given.
pub fn render_metadata(
    ctx: &GlobalContext,
    config: &Config,
    arch: Option<HostArch>,
    exec: &mut dyn Executor,
) -> Result<DebianMetadata> {
    let version = VersionMeta::load(&ctx.meta_path())?;
    let arch = match arch {
        Some(arch) => arch,
        None => query_host_arch(exec)?,
    };
    let deps = DependencySet::for_arch(&arch);
    Ok(DebianMetadata::generate(
        &config.identity(),
        &version,
        &arch,
        &deps,
    ))
}

fn run_make(
    ctx: &GlobalContext,
    plat_flags: Option<&str>,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<()> {
    let mut cmd = ProcessBuilder::new("make").cwd(ctx.source_dir());
    if let Some(flags) = plat_flags {
        cmd = cmd.env("PLAT_FLAGS", flags);
    }

    let span = shell.span(Status::Building, format!("`{}`", cmd));
    exec.run_checked(&cmd)?;
    span.finish();
    Ok(())
}

fn stage_install(
    ctx: &GlobalContext,
    config: &Config,
    staging: &Path,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<()> {
    let cmd = ProcessBuilder::new("make")
        .arg(config.install_target())
        .env("DESTDIR", staging.to_string_lossy())
        .cwd(ctx.source_dir());

    let span = shell.span(Status::Staging, staging.display());
    exec.run_checked(&cmd)?;
    span.finish();
    Ok(())
}

/// Write `control`, `postinst` and `postrm` into `<staging>/DEBIAN`.
pub fn write_debian_dir(staging: &Path, metadata: &DebianMetadata) -> Result<PathBuf> {
    let debian = staging.join("DEBIAN");
    ensure_dir(&debian)?;

    write_string(&debian.join("control"), &metadata.control)?;
    write_executable(&debian.join("postinst"), &metadata.postinst)?;
    write_executable(&debian.join("postrm"), &metadata.postrm)?;

    debug!("wrote {}", debian.display());
    Ok(debian)
}

fn build_deb(
    ctx: &GlobalContext,
    config: &Config,
    staging: &Path,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<PathBuf> {
    let cmd = ProcessBuilder::new("dpkg-deb")
        .args(["--build", "--root-owner-group"])
        .arg(staging)
        .cwd(ctx.source_dir());

    let span = shell.span(Status::Packaging, staging.display());
    exec.run_checked(&cmd)?;
    span.finish();

    let built = ctx.staging_deb_path(config)?;
    if !built.exists() {
        anyhow::bail!("dpkg-deb did not produce {}", built.display());
    }
    Ok(built)
}

fn install_package(
    ctx: &GlobalContext,
    package_name: &str,
    exec: &mut dyn Executor,
    shell: &Shell,
) -> Result<i32> {
    let cmd = ProcessBuilder::new("sudo")
        .args(["apt", "install", "-y", "--reinstall"])
        .arg(format!("./{}", package_name))
        .cwd(ctx.source_dir());

    shell.status(Status::Installing, package_name);
    let outcome = exec.run(&cmd)?;

    match outcome.code {
        Some(0) => {
            shell.status(Status::Installed, package_name);
            Ok(0)
        }
        Some(code) => {
            shell.error(format!("`{}` exited with code {}", cmd, code));
            Ok(code)
        }
        None => {
            shell.error(format!("`{}` was terminated by a signal", cmd));
            Ok(1)
        }
    }
}
