//! Capability-scoped file access inside a collection folder.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::error::RunnerError;

/// Handle on the folder holding a collection export.
///
/// Every file the runner writes, reads back, or removes lives in this
/// folder, so access goes through a single directory capability.
#[derive(Debug)]
pub(crate) struct CollectionFolder {
    dir: Dir,
    path: String,
}

impl CollectionFolder {
    pub(crate) fn open(path: &Utf8Path) -> Result<Self, RunnerError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| {
            RunnerError::Io {
                message: format!("failed to open collection folder '{path}': {error}"),
            }
        })?;
        Ok(Self {
            dir,
            path: path.to_string(),
        })
    }

    pub(crate) fn exists(&self, name: &str) -> bool {
        self.dir.is_file(name)
    }

    pub(crate) fn read(&self, name: &str) -> Result<String, RunnerError> {
        self.dir
            .read_to_string(name)
            .map_err(|error| RunnerError::Io {
                message: format!("failed to read '{name}' in '{}': {error}", self.path),
            })
    }

    pub(crate) fn write(&self, name: &str, contents: &str) -> Result<(), RunnerError> {
        self.dir
            .write(name, contents)
            .map_err(|error| RunnerError::Io {
                message: format!("failed to write '{name}' in '{}': {error}", self.path),
            })
    }

    /// Removes a file, logging rather than failing when removal fails.
    pub(crate) fn remove_quietly(&self, name: &str) {
        if let Err(error) = self.dir.remove_file(name) {
            tracing::warn!(file = name, folder = %self.path, %error, "failed to remove file");
        }
    }
}
