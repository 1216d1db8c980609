//! stargate-deb - builds the Stargate DAW Debian package
//!
//! This crate provides the library side of the packager: version
//! metadata, architecture-dependent control file generation, artifact
//! naming, and the sequential build pipeline that drives `make` and
//! `dpkg-deb`.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only compiled for tests. Provides a recording executor that stands in
/// for the host tools.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{DebianMetadata, DependencySet, HostArch, PackageIdentity, VersionMeta};
pub use ops::{package, PackageOptions, PackageResult};
pub use util::context::GlobalContext;
