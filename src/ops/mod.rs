//! High-level operations.
//!
//! This module contains the implementation of stargate-deb commands.

pub mod doctor;
pub mod package;

pub use doctor::{doctor, format_report, CheckResult, DoctorReport};
pub use package::{package, query_host_arch, render_metadata, PackageOptions, PackageResult};
