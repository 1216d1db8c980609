//! Test utilities and mocks for unit tests.
//!
//! [`MockExecutor`] stands in for the host tools: commands are matched by
//! their display form (`KEY=value program args...`), every call is
//! recorded, and a matched expectation can create files to imitate a
//! tool's output (e.g. `dpkg-deb` writing `tmp.deb`).
//!
//! # Example
//!
//! ```rust,ignore
//! let mut exec = MockExecutor::new();
//! exec.expect("dpkg-architecture -q DEB_HOST_ARCH", success("amd64\n"));
//! exec.expect_prefix("make", success(""));
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tempfile::TempDir;

use crate::core::META_FILE_NAME;
use crate::util::process::{Executor, ProcessBuilder, ProcessOutcome};

/// A successful outcome with the given stdout.
pub fn success(stdout: impl Into<String>) -> ProcessOutcome {
    ProcessOutcome {
        code: Some(0),
        stdout: stdout.into().into_bytes(),
        stderr: Vec::new(),
    }
}

/// A failed outcome with the given exit code and stderr.
pub fn failure(code: i32, stderr: impl Into<String>) -> ProcessOutcome {
    ProcessOutcome {
        code: Some(code),
        stdout: Vec::new(),
        stderr: stderr.into().into_bytes(),
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    pub pattern: CommandPattern,
    pub output: ProcessOutcome,
    /// Files created (empty) when the expectation matches.
    pub creates: Vec<PathBuf>,
}

/// Mock process executor for testing command execution.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<ProcessBuilder>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: ProcessOutcome) -> &mut Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output, Vec::new())
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: ProcessOutcome) -> &mut Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output, Vec::new())
    }

    /// Add an expectation that also creates a file when matched.
    pub fn expect_creating(
        &mut self,
        substring: &str,
        output: ProcessOutcome,
        creates: impl AsRef<Path>,
    ) -> &mut Self {
        self.push(
            CommandPattern::Contains(substring.to_string()),
            output,
            vec![creates.as_ref().to_path_buf()],
        )
    }

    fn push(
        &mut self,
        pattern: CommandPattern,
        output: ProcessOutcome,
        creates: Vec<PathBuf>,
    ) -> &mut Self {
        self.expectations.push(CommandExpectation {
            pattern,
            output,
            creates,
        });
        self
    }

    fn dispatch(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        let line = cmd.display_command();
        self.calls.push(cmd.clone());

        let Some(exp) = self.expectations.iter().find(|e| e.pattern.matches(&line)) else {
            bail!("unexpected command: {}", line);
        };

        for path in &exp.creates {
            std::fs::write(path, b"")?;
        }
        Ok(exp.output.clone())
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[ProcessBuilder] {
        &self.calls
    }

    /// Display form of every call, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.display_command()).collect()
    }
}

impl Executor for MockExecutor {
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        self.dispatch(cmd)
    }

    fn run(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        self.dispatch(cmd)
    }
}

/// Create a temporary source directory containing `meta.json`.
pub fn source_dir_with_meta(major: &str, minor: &str) -> TempDir {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_meta(
        tmp.path(),
        &format!(
            r#"{{"version": {{"major": "{}", "minor": "{}"}}}}"#,
            major, minor
        ),
    );
    tmp
}

/// Write raw `meta.json` contents into a directory.
pub fn write_meta(dir: &Path, contents: &str) {
    std::fs::write(dir.join(META_FILE_NAME), contents).expect("failed to write meta.json");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_matches_in_order_and_records() {
        let mut exec = MockExecutor::new();
        exec.expect("make", failure(2, "boom"))
            .expect_prefix("make", success(""));

        let outcome = exec.run(&ProcessBuilder::new("make")).unwrap();
        assert_eq!(outcome.code, Some(2));

        let outcome = exec
            .run(&ProcessBuilder::new("make").arg("install"))
            .unwrap();
        assert!(outcome.success());

        assert_eq!(exec.call_lines(), vec!["make", "make install"]);
    }

    #[test]
    fn test_mock_rejects_unexpected_command() {
        let mut exec = MockExecutor::new();
        let err = exec.capture(&ProcessBuilder::new("apt")).unwrap_err();
        assert!(err.to_string().contains("unexpected command: apt"));
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_mock_creates_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("tmp.deb");

        let mut exec = MockExecutor::new();
        exec.expect_creating("dpkg-deb", success(""), &out);
        exec.run(&ProcessBuilder::new("dpkg-deb").arg("--build"))
            .unwrap();

        assert!(out.exists());
    }
}
