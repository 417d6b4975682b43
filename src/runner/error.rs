//! Error types for collection runs.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that end a collection run without an outcome.
///
/// Each error is scoped to a single run; other runs are unaffected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// No collection file with the expected name exists below the search
    /// folder.
    #[error("could not locate collection file {file_name} below {search_folder}")]
    CollectionNotFound {
        /// Expected collection file name.
        file_name: String,
        /// Folder searched recursively.
        search_folder: Utf8PathBuf,
    },

    /// More than one collection file with the expected name exists.
    #[error("could not locate unique collection file {file_name}: {} matches", paths.len())]
    AmbiguousCollection {
        /// Expected collection file name.
        file_name: String,
        /// Every matching path.
        paths: Vec<Utf8PathBuf>,
    },

    /// Data line selection was requested for a non-CSV data file.
    #[error("data line selection is only supported for CSV data files: {path}")]
    UnsupportedDataFile {
        /// Data file path.
        path: Utf8PathBuf,
    },

    /// No data row matched the requested selectors.
    #[error("no data lines with {selectors} found in file {file_name}")]
    NoMatchingDataLines {
        /// Raw `;`-separated selectors.
        selectors: String,
        /// Data file name.
        file_name: String,
    },

    /// The runner process could not start, wrote to stderr, or left no
    /// report behind.
    #[error("{message}\n{debug_info}")]
    Execution {
        /// Failure summary.
        message: String,
        /// Rendered debug information block.
        debug_info: String,
    },

    /// The JSON report could not be parsed.
    #[error("failed to parse Newman report: {message}\n{debug_info}")]
    Report {
        /// Parser error detail.
        message: String,
        /// Rendered debug information block.
        debug_info: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
