//! Debug information attached to runner errors and debug logs.

use camino::Utf8Path;
use chrono::Utc;

use super::command::RunnerCommand;
use super::process::ProcessOutput;

/// Everything needed to diagnose a single run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DebugInfo<'a> {
    pub(crate) collection: &'a Utf8Path,
    pub(crate) output: &'a Utf8Path,
    pub(crate) work_folder: Option<&'a str>,
    pub(crate) command: &'a RunnerCommand,
    pub(crate) process: &'a ProcessOutput,
}

impl DebugInfo<'_> {
    /// Renders the block, optionally preceded by a note.
    pub(crate) fn render(&self, note: &str) -> String {
        let mut text = String::from("Debug information...\n");
        if !note.is_empty() {
            text.push_str(note);
            text.push('\n');
        }
        let exit_code = self
            .process
            .exit_code
            .map_or_else(|| "none".to_owned(), |code| code.to_string());
        text.push_str(&format!(
            "Collection file path : {}\n\
             Output file path     : {}\n\
             System_WorkFolder    : {}\n\
             Command line input   : {}\n\
             Exit code            : {exit_code}\n\
             Command line output  : {}\n\
             Command line error   : {}",
            self.collection,
            self.output,
            self.work_folder.unwrap_or_default(),
            self.command.display(),
            self.process.stdout,
            self.process.stderr,
        ));
        text
    }

    /// Contents of the debug log file written when debugging is enabled.
    pub(crate) fn log_file_contents(&self) -> String {
        format!(
            "Generated at {}\n{}\n",
            Utc::now().to_rfc3339(),
            self.render("")
        )
    }
}
