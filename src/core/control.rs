//! `DEBIAN/` metadata: the control file and the lifecycle scripts.
//!
//! Stargate installs self-contained under `/opt/<package>`. The lifecycle
//! scripts expose it to the rest of the system with symlinks:
//! `postinst` replaces any stale entries and links them, `postrm` removes
//! them again. Both scripts are generated from the same link table so they
//! cannot drift apart.

use std::fmt::Write;

use crate::core::{DependencySet, HostArch, VersionMeta};

/// Default package name.
pub const DEFAULT_PACKAGE_NAME: &str = "stargate";

/// Default maintainer address.
pub const DEFAULT_MAINTAINER: &str = "stargateaudio@noreply.github.com";

/// Default description: one summary line followed by continuation lines.
pub const DEFAULT_DESCRIPTION: &[&str] = &[
    "A holistic audio production solution.",
    "Stargate is a DAW, instruments, effects and a wave editor.",
    "Everything you need to create music on a computer.",
];

/// Name, maintainer and description of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    pub name: String,
    pub maintainer: String,
    /// First line is the synopsis; the rest is the extended description.
    pub description: Vec<String>,
}

impl Default for PackageIdentity {
    fn default() -> Self {
        PackageIdentity {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            maintainer: DEFAULT_MAINTAINER.to_string(),
            description: DEFAULT_DESCRIPTION.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PackageIdentity {
    /// Install prefix of the self-contained tree.
    pub fn install_prefix(&self) -> String {
        format!("/opt/{}", self.name)
    }
}

/// A system path that points into the install prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemLink {
    /// Absolute path inside `/opt/<package>`.
    pub target: String,
    /// System location of the symlink.
    pub link: String,
    /// Whether the link stands in for a directory.
    pub is_dir: bool,
}

impl SystemLink {
    fn file(target: String, link: String) -> Self {
        SystemLink {
            target,
            link,
            is_dir: false,
        }
    }

    fn dir(target: String, link: String) -> Self {
        SystemLink {
            target,
            link,
            is_dir: true,
        }
    }

    fn rm_command(&self) -> String {
        let flags = if self.is_dir { "-rf" } else { "-f" };
        format!("rm {} {}", flags, self.link)
    }
}

/// Symlinks created by `postinst` and removed by `postrm`.
pub fn system_links(identity: &PackageIdentity) -> Vec<SystemLink> {
    let name = &identity.name;
    let prefix = identity.install_prefix();
    let share = format!("{}/files/share", prefix);

    vec![
        SystemLink::file(
            format!("{}/scripts/{}", prefix, name),
            format!("/usr/bin/{}", name),
        ),
        SystemLink::dir(
            format!("{}/doc/{}", share, name),
            format!("/usr/share/doc/{}", name),
        ),
        SystemLink::file(
            format!("{}/pixmaps/{}.png", share, name),
            format!("/usr/share/pixmaps/{}.png", name),
        ),
        SystemLink::file(
            format!("{}/pixmaps/{}.ico", share, name),
            format!("/usr/share/pixmaps/{}.ico", name),
        ),
        SystemLink::file(
            format!("{}/applications/{}.desktop", share, name),
            format!("/usr/share/applications/{}.desktop", name),
        ),
        SystemLink::file(
            format!("{}/mime/packages/{}.xml", share, name),
            format!("/usr/share/mime/packages/{}.xml", name),
        ),
    ]
}

/// Generated contents of the `DEBIAN/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebianMetadata {
    pub control: String,
    pub postinst: String,
    pub postrm: String,
}

impl DebianMetadata {
    /// Generate all three files for one package build.
    pub fn generate(
        identity: &PackageIdentity,
        version: &VersionMeta,
        arch: &HostArch,
        deps: &DependencySet,
    ) -> Self {
        DebianMetadata {
            control: render_control(identity, version, arch, deps),
            postinst: render_postinst(identity),
            postrm: render_postrm(identity),
        }
    }
}

/// Render the control file.
///
/// `Version` is the minor field of the version metadata.
pub fn render_control(
    identity: &PackageIdentity,
    version: &VersionMeta,
    arch: &HostArch,
    deps: &DependencySet,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Package: {}", identity.name);
    let _ = writeln!(out, "Version: {}", version.minor());
    let _ = writeln!(out, "Architecture: {}", arch);
    let _ = writeln!(out, "Maintainer: {}", identity.maintainer);

    let mut lines = identity.description.iter();
    let _ = writeln!(out, "Description: {}", lines.next().map_or("", |s| s.as_str()));
    for line in lines {
        let _ = writeln!(out, "  {}", line);
    }

    let _ = writeln!(out, "Build-Depends: {}", deps.build_depends_field());
    let _ = writeln!(out, "Depends: {}", deps.depends_field());
    let _ = writeln!(out, "Recommends: {}", deps.recommends_field());
    out
}

/// Render `postinst`: clear stale entries, then link into the install prefix.
pub fn render_postinst(identity: &PackageIdentity) -> String {
    let links = system_links(identity);
    let mut out = String::from("#!/bin/sh\n\n");

    for link in &links {
        let _ = writeln!(out, "{}", link.rm_command());
    }
    out.push('\n');
    for link in &links {
        let _ = writeln!(out, "ln -s {} {} || true", link.target, link.link);
    }
    out
}

/// Render `postrm`: remove every system link.
pub fn render_postrm(identity: &PackageIdentity) -> String {
    let mut out = String::from("#!/bin/sh\n\n");
    for link in system_links(identity) {
        let _ = writeln!(out, "{} || true", link.rm_command());
    }
    out
}
