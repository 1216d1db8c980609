//! Host tool checks.
//!
//! The `doctor` command verifies that everything `stargate-deb build`
//! shells out to is installed, and that the source directory looks right.
//!
//! ## Checks Performed
//!
//! - `make`, `dpkg-architecture`, `dpkg-deb` (required)
//! - `meta.json` in the source directory (required)
//! - `sudo` and `apt` (optional, needed for `--install`)
//! - `os-release` distro identity (optional, used in the artifact name)

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::core::{DistroInfo, VersionMeta};
use crate::util::process::find_executable;
use crate::util::{Executor, GlobalContext, ProcessBuilder};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..Self::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the tool path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: BTreeMap<String, String>,
}

impl DoctorReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result.
    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Get the count of passed checks.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get the count of failed checks.
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get the count of required failed checks.
    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }
}

/// A host tool the packager depends on.
struct ToolSpec {
    name: &'static str,
    purpose: &'static str,
    version_args: &'static [&'static str],
    required: bool,
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "make",
        purpose: "builds and stages Stargate",
        version_args: &["--version"],
        required: true,
    },
    ToolSpec {
        name: "dpkg-architecture",
        purpose: "reports the host architecture",
        version_args: &["--version"],
        required: true,
    },
    ToolSpec {
        name: "dpkg-deb",
        purpose: "assembles the .deb",
        version_args: &["--version"],
        required: true,
    },
    ToolSpec {
        name: "sudo",
        purpose: "needed for --install",
        version_args: &["--version"],
        required: false,
    },
    ToolSpec {
        name: "apt",
        purpose: "needed for --install",
        version_args: &["--version"],
        required: false,
    },
];

/// Run all checks.
pub fn doctor(ctx: &GlobalContext, exec: &mut dyn Executor) -> Result<DoctorReport> {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());
    report.environment.insert(
        "source_dir".to_string(),
        ctx.source_dir().display().to_string(),
    );

    for tool in TOOLS {
        report.add(check_tool(tool, exec));
    }
    report.add(check_meta(ctx));
    report.add(check_distro(ctx.detect_distro()));

    report.total_duration = start.elapsed();
    Ok(report)
}

fn check_tool(tool: &ToolSpec, exec: &mut dyn Executor) -> CheckResult {
    let start = Instant::now();

    let result = match find_executable(tool.name) {
        Some(path) => {
            let cmd = ProcessBuilder::new(tool.name).args(tool.version_args);
            let version = exec
                .capture(&cmd)
                .ok()
                .and_then(|out| first_line(&out.stdout))
                .unwrap_or_else(|| "unknown version".to_string());

            CheckResult::pass(tool.name, format!("Found {} ({})", tool.name, tool.purpose))
                .with_path(path)
                .with_version(version)
        }
        None => CheckResult::fail(
            tool.name,
            format!("{} not found in PATH ({})", tool.name, tool.purpose),
        ),
    };

    let result = result.with_duration(start.elapsed());
    if tool.required {
        result
    } else {
        result.optional()
    }
}

fn check_meta(ctx: &GlobalContext) -> CheckResult {
    let start = Instant::now();
    let path = ctx.meta_path();

    let result = match VersionMeta::load(&path) {
        Ok(meta) => CheckResult::pass("meta.json", format!("Version {}", meta))
            .with_version(meta.minor()),
        Err(e) => CheckResult::fail("meta.json", e.to_string()),
    };

    result.with_path(path).with_duration(start.elapsed())
}

fn check_distro(distro: Option<DistroInfo>) -> CheckResult {
    match distro {
        Some(d) => CheckResult::pass("distro", format!("{} {}", d.name, d.version)).optional(),
        None => CheckResult::fail(
            "distro",
            "os-release not found; package names will omit the distro",
        )
        .optional(),
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let _ = writeln!(output, "stargate-deb doctor");
    let _ = writeln!(output, "===================\n");

    if verbose {
        let _ = writeln!(output, "Environment:");
        for (key, value) in &report.environment {
            let _ = writeln!(output, "  {}: {}", key, value);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose || !check.passed {
            let _ = writeln!(output, "      {}", check.message);
        }
        if verbose {
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
        }
    }

    let _ = writeln!(output);

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    let _ = writeln!(output, "Summary: {} passed, {} failed", passed, failed);

    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\n{} required check(s) failed. `stargate-deb build` will not work.",
            required_failed
        );
    } else if failed > 0 {
        let _ = writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) failed.",
            failed
        );
    } else {
        let _ = writeln!(output, "\nAll checks passed.");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{source_dir_with_meta, write_meta};
    use tempfile::TempDir;

    #[test]
    fn test_check_result_optional() {
        let result = CheckResult::fail("apt", "missing").optional();
        assert!(!result.passed);
        assert!(!result.required);
    }

    #[test]
    fn test_doctor_report_optional_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("make", "ok"));
        report.add(CheckResult::fail("apt", "missing").optional());

        assert!(report.all_required_passed());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.required_failed_count(), 0);
    }

    #[test]
    fn test_doctor_report_required_failed() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("make", "ok"));
        report.add(CheckResult::fail("dpkg-deb", "missing"));

        assert!(!report.all_required_passed());
        assert_eq!(report.required_failed_count(), 1);
    }

    #[test]
    fn test_check_meta() {
        let tmp = source_dir_with_meta("stargate", "23.11.3");
        let ctx = GlobalContext::with_source_dir(tmp.path()).unwrap();
        let check = check_meta(&ctx);
        assert!(check.passed);
        assert_eq!(check.version.as_deref(), Some("23.11.3"));

        write_meta(tmp.path(), "[]");
        assert!(!check_meta(&ctx).passed);

        let empty = TempDir::new().unwrap();
        let ctx = GlobalContext::with_source_dir(empty.path()).unwrap();
        let check = check_meta(&ctx);
        assert!(!check.passed);
        assert!(check.required);
    }

    #[test]
    fn test_check_distro_is_optional() {
        assert!(!check_distro(None).required);
        let check = check_distro(Some(DistroInfo {
            name: "debian".to_string(),
            version: "12".to_string(),
        }));
        assert!(check.passed);
        assert_eq!(check.message, "debian 12");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line(b"\nGNU Make 4.3\nBuilt for x86_64\n").as_deref(),
            Some("GNU Make 4.3")
        );
        assert_eq!(first_line(b""), None);
    }

    #[test]
    fn test_format_report() {
        let mut report = DoctorReport::new();
        report.add(CheckResult::pass("make", "Found make"));
        report.add(CheckResult::fail("apt", "apt not found in PATH").optional());

        let output = format_report(&report, false);
        assert!(output.contains("[OK] make\n"));
        assert!(output.contains("[!!] apt (optional)\n      apt not found in PATH\n"));
        assert!(output.contains("Summary: 1 passed, 1 failed"));
        assert!(output.contains("All required checks passed."));
    }
}
