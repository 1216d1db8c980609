//! Core data for the Debian package.
//!
//! This module contains the values a packaging run is built from:
//! - Version metadata read from `meta.json`
//! - The host architecture reported by `dpkg-architecture`
//! - Dependency lists and the architecture-specific additions
//! - Control file and lifecycle script text
//! - Distro identity and the artifact file name

pub mod arch;
pub mod control;
pub mod deps;
pub mod distro;
pub mod meta;
pub mod naming;

pub use arch::{ArchError, HostArch};
pub use control::{DebianMetadata, PackageIdentity};
pub use deps::DependencySet;
pub use distro::DistroInfo;
pub use meta::{MetaError, VersionMeta, META_FILE_NAME};
pub use naming::package_file_name;
