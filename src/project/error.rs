//! Error types for project configuration resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, parsing, or validating the project
/// configuration. All of them are fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Neither a discovered configuration file nor the fallback exists.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// Fallback path that was checked last.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file {}: {message}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error detail.
        message: String,
    },

    /// Reading a directory or file failed.
    #[error("I/O error reading {}: {message}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The connection URL is not an absolute URL.
    #[error("connection URL '{value}' is invalid: {message}")]
    InvalidUrl {
        /// Raw URL string.
        value: String,
        /// Parser error detail.
        message: String,
    },
}
