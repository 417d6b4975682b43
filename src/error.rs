//! Application-level error aggregating the failures of each subsystem.

use thiserror::Error;

use crate::manifest::EnumerationError;
use crate::project::ConfigurationError;
use crate::runner::RunnerError;
use crate::workitems::WorkItemError;
use crate::workspace::WorkspaceError;

/// Errors surfaced to the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// Application settings could not be loaded.
    #[error("settings error: {message}")]
    Settings {
        /// Details about the settings failure.
        message: String,
    },

    /// The project configuration could not be resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The workspace root could not be determined.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// The automated tests could not be enumerated.
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    /// The work item store could not be set up.
    #[error(transparent)]
    WorkItems(#[from] WorkItemError),

    /// A collection run failed before producing an outcome.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
