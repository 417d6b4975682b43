//! CLI operation mode handlers.
//!
//! - [`sync`]: reconcile manifest tests with ADO Test Case work items
//! - [`run_collection`]: run one collection folder through Newman
//!
//! Output formatting lives in [`output`]; subscriber setup in [`logging`].

pub mod logging;
pub mod output;
pub mod run_collection;
pub mod sync;

use std::env;
use std::path::PathBuf;

use postman_ado::AppError;

/// Directory the process was started in.
///
/// # Errors
///
/// Returns [`AppError::Io`] when the current directory cannot be read.
pub fn current_dir() -> Result<PathBuf, AppError> {
    env::current_dir().map_err(|error| AppError::Io {
        message: format!("failed to read current directory: {error}"),
    })
}
