//! Runner process execution.

use std::process::Command;

use super::command::RunnerCommand;
use super::error::RunnerError;

/// Captured result of a finished runner process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code, absent when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Executes runner commands.
#[cfg_attr(test, mockall::automock)]
pub trait CollectionRunner: Send + Sync {
    /// Runs `command` to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Execution`] when the process cannot be
    /// started.
    fn run(&self, command: &RunnerCommand) -> Result<ProcessOutput, RunnerError>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCollectionRunner;

impl CollectionRunner for SystemCollectionRunner {
    fn run(&self, command: &RunnerCommand) -> Result<ProcessOutput, RunnerError> {
        tracing::debug!(command = %command.display(), "starting runner process");
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|error| RunnerError::Execution {
                message: format!("failed to launch {}: {error}", command.program),
                debug_info: format!("Command line input   : {}", command.display()),
            })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
