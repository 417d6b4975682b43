//! Postman collection runs through Newman.
//!
//! A run locates a collection export below the workspace search folder,
//! picks up its companion files, optionally narrows the iteration data to
//! selected rows, executes Newman, and turns the JSON report into a
//! [`CollectionOutcome`].

mod command;
mod datafile;
mod debug;
mod error;
mod files;
mod flags;
mod folder;
mod process;
mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

use camino::{Utf8Path, Utf8PathBuf};
use uuid::Uuid;

pub use command::{
    DEFAULT_NEWMAN_PROGRAM, NewmanInputs, RunnerCommand, debug_file_name, output_file_name,
};
pub use datafile::{filter_data_lines, is_csv};
pub use error::RunnerError;
pub use files::{
    COLLECTION_FILE_SUFFIX, CollectionFiles, collection_file_name, collection_files,
    locate_collection,
};
pub use flags::{
    POSTMAN_DEBUG_VARIABLE, PRESERVE_OUTPUT_VARIABLE, RunnerFlags, SYSTEM_DEBUG_VARIABLE,
    UPLOAD_OUTPUT_VARIABLE,
};
#[cfg(test)]
pub use process::MockCollectionRunner;
pub use process::{CollectionRunner, ProcessOutput, SystemCollectionRunner};
pub use report::{RunSummary, parse_report};

use self::debug::DebugInfo;
use self::folder::CollectionFolder;

/// Result of a completed collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionOutcome {
    /// Activity was recorded and nothing failed.
    Passed,
    /// The report listed failures.
    Failed {
        /// Each failure rendered as compact JSON.
        failures: Vec<String>,
    },
    /// No activity was recorded: iterations, items, requests, and tests
    /// all totalled zero.
    Inconclusive {
        /// Rendered debug information block.
        debug_info: String,
    },
}

impl CollectionOutcome {
    /// Whether the outcome counts as a pass.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// A file reported alongside a run result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAttachment {
    /// Where the file was written.
    pub path: Utf8PathBuf,
    /// File contents captured before any cleanup.
    pub contents: String,
}

/// Outcome plus supporting artefacts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRunReport {
    /// Pass, fail, or inconclusive.
    pub outcome: CollectionOutcome,
    /// Result attachments, populated when output upload is enabled.
    pub attachments: Vec<RunAttachment>,
    /// Captured runner output.
    pub process: ProcessOutput,
}

/// One Newman run of a collection folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRun {
    collection_name: String,
    folder: String,
    search_folder: Utf8PathBuf,
    dataline: Option<String>,
    program: String,
    flags: RunnerFlags,
    work_folder: Option<String>,
}

impl CollectionRun {
    /// Creates a run of `folder` within collection `collection_name`.
    #[must_use]
    pub fn new(
        collection_name: impl Into<String>,
        folder: impl Into<String>,
        search_folder: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            folder: folder.into(),
            search_folder: search_folder.into(),
            dataline: None,
            program: DEFAULT_NEWMAN_PROGRAM.to_owned(),
            flags: RunnerFlags::default(),
            work_folder: None,
        }
    }

    /// Restricts CSV iteration data to rows matching `selectors`.
    #[must_use]
    pub fn with_dataline(mut self, selectors: impl Into<String>) -> Self {
        self.dataline = Some(selectors.into());
        self
    }

    /// Overrides the Newman executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the operational flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: RunnerFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Records the pipeline work folder for debug output.
    #[must_use]
    pub fn with_work_folder(mut self, work_folder: impl Into<String>) -> Self {
        self.work_folder = Some(work_folder.into());
        self
    }

    /// Collection name without the export suffix.
    #[must_use]
    pub const fn collection_name(&self) -> &str {
        self.collection_name.as_str()
    }

    /// Folder within the collection.
    #[must_use]
    pub const fn folder(&self) -> &str {
        self.folder.as_str()
    }

    /// Executes the run and interprets its report.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the collection cannot be located, the
    /// data selection fails, the process cannot run, writes to stderr,
    /// leaves no report, or the report cannot be parsed.
    pub fn execute<R>(&self, runner: &R) -> Result<CollectionRunReport, RunnerError>
    where
        R: CollectionRunner + ?Sized,
    {
        let file_name = collection_file_name(&self.collection_name);
        let files = CollectionFiles::discover(locate_collection(&self.search_folder, &file_name)?);
        let folder_path = files.folder().to_path_buf();
        let folder = CollectionFolder::open(&folder_path)?;

        let filtered_data = self.prepare_data_file(&files, &folder)?;
        let data = filtered_data
            .as_deref()
            .map(|name| folder_path.join(name))
            .or_else(|| files.data.clone());
        let output_name = output_file_name(&self.collection_name, &self.folder);
        let output_path = folder_path.join(&output_name);

        let command = RunnerCommand::newman(
            &self.program,
            NewmanInputs {
                collection: &files.collection,
                folder: &self.folder,
                globals: files.globals.as_deref(),
                data: data.as_deref(),
                environment: files.environment.as_deref(),
                output: &output_path,
                verbose: self.flags.debug,
            },
        );
        tracing::info!(
            collection = %self.collection_name,
            folder = %self.folder,
            command = %command.display(),
            "running collection"
        );

        let result = runner.run(&command);
        if let Some(name) = filtered_data.as_deref() {
            folder.remove_quietly(name);
        }
        let process = result?;

        let debug = DebugInfo {
            collection: &files.collection,
            output: &output_path,
            work_folder: self.work_folder.as_deref(),
            command: &command,
            process: &process,
        };
        let (outcome, attachments) = self.interpret(&folder, &output_name, &output_path, &debug)?;
        Ok(CollectionRunReport {
            outcome,
            attachments,
            process,
        })
    }

    fn interpret(
        &self,
        folder: &CollectionFolder,
        output_name: &str,
        output_path: &Utf8Path,
        debug: &DebugInfo<'_>,
    ) -> Result<(CollectionOutcome, Vec<RunAttachment>), RunnerError> {
        if self.flags.debug {
            folder.write(
                &debug_file_name(&self.collection_name, &self.folder),
                &debug.log_file_contents(),
            )?;
        }

        if !folder.exists(output_name) {
            return Err(RunnerError::Execution {
                message: format!("could not find Newman output file {output_path}"),
                debug_info: debug.render(""),
            });
        }
        let report_text = folder.read(output_name)?;

        let mut attachments = Vec::new();
        if self.flags.upload_output {
            attachments.push(RunAttachment {
                path: output_path.to_path_buf(),
                contents: report_text.clone(),
            });
        }

        if !debug.process.stderr.trim().is_empty() {
            return Err(RunnerError::Execution {
                message: "Newman wrote to stderr".to_owned(),
                debug_info: debug.render(""),
            });
        }

        let summary = parse_report(&report_text).map_err(|message| RunnerError::Report {
            message,
            debug_info: debug.render(""),
        })?;

        if !self.flags.preserve_output {
            folder.remove_quietly(output_name);
        }

        if !summary.failures.is_empty() {
            for failure in &summary.failures {
                tracing::info!(%failure, "collection failure");
            }
            return Ok((
                CollectionOutcome::Failed {
                    failures: summary.failures,
                },
                attachments,
            ));
        }

        if summary.activity == 0 {
            tracing::warn!(
                collection = %self.collection_name,
                folder = %self.folder,
                "no activity recorded"
            );
            return Ok((
                CollectionOutcome::Inconclusive {
                    debug_info: debug.render("NoActivityRecorded"),
                },
                attachments,
            ));
        }

        Ok((CollectionOutcome::Passed, attachments))
    }

    /// Writes the filtered data copy and returns its file name.
    fn prepare_data_file(
        &self,
        files: &CollectionFiles,
        folder: &CollectionFolder,
    ) -> Result<Option<String>, RunnerError> {
        let Some(selectors) = self
            .dataline
            .as_deref()
            .filter(|selectors| !selectors.trim().is_empty())
        else {
            return Ok(None);
        };
        let Some(data) = files.data.as_deref() else {
            tracing::warn!(
                collection = %self.collection_name,
                "data line selection ignored: collection has no data file"
            );
            return Ok(None);
        };

        let data_name = data.file_name().unwrap_or_default();
        if !is_csv(data_name) {
            return Err(RunnerError::UnsupportedDataFile {
                path: data.to_path_buf(),
            });
        }

        let content = folder.read(data_name)?;
        let filtered = filter_data_lines(&content, selectors).ok_or_else(|| {
            RunnerError::NoMatchingDataLines {
                selectors: selectors.to_owned(),
                file_name: data_name.to_owned(),
            }
        })?;

        let filtered_name = format!("{}.data.csv", Uuid::new_v4().simple());
        folder.write(&filtered_name, &filtered)?;
        tracing::debug!(file = %filtered_name, "wrote filtered data file");
        Ok(Some(filtered_name))
    }
}
