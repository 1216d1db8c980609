//! Subprocess execution utilities.
//!
//! Every external tool the packager touches goes through [`Executor`], so a
//! run can be replayed against a recording mock in tests.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use thiserror::Error;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment override.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command with stdout and stderr captured.
    pub fn exec(&self) -> Result<ProcessOutcome> {
        let output = self
            .build_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| self.spawn_context())?;

        Ok(ProcessOutcome {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Execute with inherited stdio and return the exit code only.
    pub fn status(&self) -> Result<ProcessOutcome> {
        let status = self
            .build_command()
            .status()
            .with_context(|| self.spawn_context())?;

        Ok(ProcessOutcome::code(status.code()))
    }

    fn spawn_context(&self) -> String {
        let program = self.program.display();
        if find_executable(&self.program.to_string_lossy()).is_none() {
            format!("failed to execute `{}`: not found in PATH", program)
        } else {
            format!("failed to execute `{}`", program)
        }
    }

    /// Display the command for logs and error messages.
    ///
    /// Environment overrides are shown as a `KEY=value` prefix.
    pub fn display_command(&self) -> String {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        parts.push(self.program.display().to_string());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

impl fmt::Display for ProcessBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

/// Exit code and captured output of a finished process.
///
/// `code` is `None` when the process was terminated by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutcome {
    /// An outcome with no captured output.
    pub fn code(code: Option<i32>) -> Self {
        ProcessOutcome {
            code,
            ..Default::default()
        }
    }

    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// An external command exited unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{command}` failed with exit code {code}")]
    Failed { command: String, code: i32 },

    #[error("`{command}` was terminated by a signal")]
    Terminated { command: String },
}

impl CommandError {
    fn from_outcome(cmd: &ProcessBuilder, outcome: &ProcessOutcome) -> Self {
        let command = cmd.display_command();
        match outcome.code {
            Some(code) => CommandError::Failed { command, code },
            None => CommandError::Terminated { command },
        }
    }
}

/// Runs external commands.
pub trait Executor {
    /// Run to completion with stdout and stderr captured.
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome>;

    /// Run to completion with stdio inherited from this process.
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome>;

    /// Run with inherited stdio and require success.
    fn run_checked(&mut self, cmd: &ProcessBuilder) -> Result<()> {
        tracing::debug!("running `{}`", cmd);
        let outcome = self.run(cmd)?;
        if !outcome.success() {
            return Err(CommandError::from_outcome(cmd, &outcome).into());
        }
        Ok(())
    }

    /// Capture output and require success.
    fn capture_checked(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        tracing::debug!("querying `{}`", cmd);
        let outcome = self.capture(cmd)?;
        if !outcome.success() {
            let err = anyhow::Error::new(CommandError::from_outcome(cmd, &outcome));
            let stderr = String::from_utf8_lossy(&outcome.stderr).trim().to_string();
            if stderr.is_empty() {
                return Err(err);
            }
            return Err(err.context(stderr));
        }
        Ok(outcome)
    }
}

/// Executor that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        cmd.exec()
    }

    fn run(&mut self, cmd: &ProcessBuilder) -> Result<ProcessOutcome> {
        cmd.status()
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
