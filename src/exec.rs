//! External process execution.
//!
//! Hooks are the only place the linker shells out.  Execution goes through
//! the [`Executor`] trait so the hook runner can be tested without spawning
//! processes.
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over process execution.
pub trait Executor: std::fmt::Debug {
    /// Run `program` with `args` in `dir`, returning the result even when the
    /// process exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be spawned.
    fn run_unchecked_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        run_unchecked_in(dir, program, args)
    }
}

/// Run a command in a specific directory, allowing failure (returns result
/// without bailing).
///
/// # Errors
///
/// Returns an error if the process cannot be spawned.
pub fn run_unchecked_in(dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("failed to execute: {program} in {}", dir.display()))?;

    Ok(ExecResult::from(output))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn run_unchecked_in_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_unchecked_in(dir.path(), "sh", &["-c", "echo hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn run_unchecked_in_runs_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        run_unchecked_in(dir.path(), "sh", &["-c", "touch marker"]).unwrap();
        assert!(dir.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn run_unchecked_in_failure_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_unchecked_in(dir.path(), "sh", &["-c", "exit 3"]).unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(3));
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_unchecked_in(dir.path(), "this-program-does-not-exist-12345", &[]);
        assert!(result.is_err());
    }
}
