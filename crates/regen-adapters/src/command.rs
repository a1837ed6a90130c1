//! Shell command runner for watch tasks.

use std::path::Path;
use std::process::Command;

use regen_core::{
    application::{ApplicationError, CommandOutput, ports::CommandRunner},
    error::RegenResult,
};
use tracing::{debug, instrument};

/// Build a [`Command`] that executes `command` via the system shell.
///
/// - Unix: `sh -c "{command}"`
/// - Windows: `cmd /C "{command}"`
pub(crate) fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut c = Command::new("cmd");
        c.args(["/C", command]);
        c
    }
    #[cfg(not(windows))]
    {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Runs commands through the platform shell and captures their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellCommandRunner {
    #[instrument(skip(self))]
    fn run(&self, command: &str, workdir: &Path) -> RegenResult<CommandOutput> {
        let output = shell_command(command)
            .current_dir(workdir)
            .output()
            .map_err(|e| ApplicationError::CommandFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!(success = result.success, status = ?result.status, "command finished");
        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout_and_runs_in_workdir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let output = ShellCommandRunner::new().run("ls", dir.path()).unwrap();
        assert!(output.success);
        assert!(output.stdout.contains("marker.txt"));
    }

    #[test]
    fn non_zero_exit_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let output = ShellCommandRunner::new()
            .run("echo oops >&2; exit 3", dir.path())
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.status, Some(3));
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn missing_workdir_cannot_start() {
        let dir = TempDir::new().unwrap();
        let result = ShellCommandRunner::new().run("true", &dir.path().join("gone"));
        assert!(result.is_err());
    }
}
