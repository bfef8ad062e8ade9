//! External command execution for address configuration.
//!
//! Address changes are applied by spawning the system `ip` tool and
//! waiting for it to exit; success means exit status 0. The runner is a
//! trait so tests substitute a fake that records invocations and returns
//! scripted statuses.

use std::io;
use std::process::Command;

/// Outcome of one finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// True iff the process exited with status 0.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Captured standard error, trimmed.
    pub stderr: String,
}

impl CommandOutput {
    /// A zero-exit outcome with no diagnostics.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// A nonzero-exit outcome.
    #[must_use]
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.to_string(),
        }
    }
}

/// Synchronous process spawner.
///
/// `run` blocks until the child terminates; there is no timeout, so a
/// hung child hangs the caller.
pub trait CommandRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_runner_reports_exit_status() {
        let mut runner = SystemRunner::new();
        let ok = runner.run("true", &[]).unwrap();
        assert!(ok.success);
        assert_eq!(ok.code, Some(0));

        let bad = runner.run("false", &[]).unwrap();
        assert!(!bad.success);
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let mut runner = SystemRunner::new();
        assert!(runner
            .run("/nonexistent/vnet-test-binary", &[])
            .is_err());
    }
}
