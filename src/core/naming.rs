//! Artifact file name.

use crate::core::{DistroInfo, HostArch, VersionMeta};

/// Build the artifact name:
/// `<major>-<minor>-[<distro>-<distro_version>-]<arch>.deb`.
pub fn package_file_name(
    version: &VersionMeta,
    distro: Option<&DistroInfo>,
    arch: &HostArch,
) -> String {
    match distro {
        Some(d) => format!(
            "{}-{}-{}-{}-{}.deb",
            version.major(),
            version.minor(),
            d.name,
            d.version,
            arch
        ),
        None => format!("{}-{}-{}.deb", version.major(), version.minor(), arch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_without_distro() {
        let name = package_file_name(
            &VersionMeta::new("stargate", "23.11.3"),
            None,
            &HostArch::new("amd64").unwrap(),
        );
        assert_eq!(name, "stargate-23.11.3-amd64.deb");
    }

    #[test]
    fn test_name_with_distro() {
        let distro = DistroInfo {
            name: "ubuntu".to_string(),
            version: "22.04".to_string(),
        };
        let name = package_file_name(
            &VersionMeta::new("stargate", "23.11.3"),
            Some(&distro),
            &HostArch::new("arm64").unwrap(),
        );
        assert_eq!(name, "stargate-23.11.3-ubuntu-22.04-arm64.deb");
    }

    #[test]
    fn test_version_and_arch_order() {
        let version = VersionMeta::new("major", "minor");
        let arch = HostArch::new("armhf").unwrap();
        let distro = DistroInfo {
            name: "debian".to_string(),
            version: "12".to_string(),
        };

        for name in [
            package_file_name(&version, None, &arch),
            package_file_name(&version, Some(&distro), &arch),
        ] {
            let major = name.find("major").unwrap();
            let minor = name.find("minor").unwrap();
            let arch_pos = name.rfind("armhf").unwrap();
            assert!(major < minor && minor < arch_pos);
            assert!(name.ends_with("-armhf.deb"));
        }
    }
}
