//! Deterministic runner used by integration tests.

use std::fs;

use super::command::RunnerCommand;
use super::error::RunnerError;
use super::process::{CollectionRunner, ProcessOutput};

const EXPORT_FLAG: &str = "--reporter-json-export";

/// Runner that writes a canned JSON report to the requested export path
/// instead of launching Newman.
#[derive(Debug, Clone, Default)]
pub struct ReportWritingRunner {
    report: String,
    stderr: String,
}

impl ReportWritingRunner {
    /// Creates a runner that writes `report`.
    #[must_use]
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            stderr: String::new(),
        }
    }

    /// Adds stderr output to every run.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }
}

impl CollectionRunner for ReportWritingRunner {
    fn run(&self, command: &RunnerCommand) -> Result<ProcessOutput, RunnerError> {
        let output = command
            .args
            .iter()
            .skip_while(|arg| arg.as_str() != EXPORT_FLAG)
            .nth(1)
            .ok_or_else(|| RunnerError::Execution {
                message: "command has no JSON export path".to_owned(),
                debug_info: command.display(),
            })?;
        fs::write(output, &self.report).map_err(|error| RunnerError::Io {
            message: format!("failed to write report '{output}': {error}"),
        })?;
        Ok(ProcessOutput {
            stdout: format!("{}\n", command.display()),
            stderr: self.stderr.clone(),
            exit_code: Some(0),
        })
    }
}
