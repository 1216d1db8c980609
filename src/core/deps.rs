//! Dependency lists for the control file.

use crate::core::HostArch;

/// Packages needed to build Stargate from source.
pub const BUILD_DEPENDS: &[&str] = &[
    "autoconf",
    "automake",
    "build-essential",
    "cython3",
    "debhelper",
    "dh-make",
    "g++",
    "gcc",
    "gdb",
    "gettext",
    "libasound2-dev",
    "libfftw3-dev",
    "libportmidi-dev",
    "libsndfile1-dev",
    "libtool",
    "portaudio19-dev",
    "python3-dev",
    "python3-pip",
];

/// Runtime dependencies, in declared order.
pub const DEPENDS: &[&str] = &[
    "fftw3",
    "libasound2",
    "libportaudio2",
    "libportmidi0",
    "libsndfile1",
    "python3",
    "python3-jinja2",
    "python3-mido",
    "python3-mutagen",
    "python3-numpy",
    "python3-psutil",
    "python3-pyqt6 | python3-pyqt5",
    "python3-pyqt6.qtsvg | python3-pyqt5.qtsvg",
    "python3-yaml",
    "rubberband-cli",
    "vorbis-tools",
];

/// Optional packages that enable extra import/export formats.
pub const RECOMMENDS: &[&str] = &["ffmpeg", "lame"];

/// Extra runtime dependency on ARM hosts.
///
/// Used to detect whether a Raspberry Pi runs a desktop light enough to
/// render the UI.
pub const ARM_EXTRA_DEPENDS: &str = "wmctrl";

/// The dependency fields of one control file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    pub build_depends: Vec<String>,
    pub depends: Vec<String>,
    pub recommends: Vec<String>,
}

impl DependencySet {
    /// Assemble the dependency lists for an architecture.
    ///
    /// ARM hosts get [`ARM_EXTRA_DEPENDS`] and a sorted runtime list so the
    /// control file diffs cleanly. Other hosts keep the declared order.
    pub fn for_arch(arch: &HostArch) -> Self {
        let mut depends = to_owned(DEPENDS);

        if arch.is_arm() {
            if !depends.iter().any(|d| d == ARM_EXTRA_DEPENDS) {
                depends.push(ARM_EXTRA_DEPENDS.to_string());
            }
            depends.sort();
        }

        DependencySet {
            build_depends: to_owned(BUILD_DEPENDS),
            depends,
            recommends: to_owned(RECOMMENDS),
        }
    }

    /// `Build-Depends` field value.
    pub fn build_depends_field(&self) -> String {
        self.build_depends.join(", ")
    }

    /// `Depends` field value.
    pub fn depends_field(&self) -> String {
        self.depends.join(", ")
    }

    /// `Recommends` field value.
    pub fn recommends_field(&self) -> String {
        self.recommends.join(", ")
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
