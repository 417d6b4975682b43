//! Error types for workspace detection.

use thiserror::Error;

/// Errors raised while locating the workspace.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    /// The start directory is not inside a Git work tree.
    #[error("not inside a Git repository")]
    NotARepository,

    /// Git operation failed.
    #[error("git error: {message}")]
    Git {
        /// Error detail from the git2 library.
        message: String,
    },
}

impl From<git2::Error> for WorkspaceError {
    fn from(error: git2::Error) -> Self {
        Self::Git {
            message: error.message().to_owned(),
        }
    }
}
