//! Workspace detection.
//!
//! A pipeline run points at the agent's work folder through
//! `System_WorkFolder`; a local run uses the enclosing Git work tree.

mod error;

use std::path::{Path, PathBuf};

use camino::{Utf8Path, Utf8PathBuf};
use git2::Repository;

use crate::environment::Environment;
use crate::runner::collection_files;

pub use error::WorkspaceError;

/// Names the pipeline agent's work folder.
pub const WORK_FOLDER_VARIABLE: &str = "System_WorkFolder";

/// Where collection files and configuration are searched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    search_folder: Utf8PathBuf,
    pipeline: bool,
}

impl Workspace {
    /// Detects the workspace for a run started in `start`.
    ///
    /// A non-blank `System_WorkFolder` wins; otherwise the Git work tree
    /// enclosing `start` is used.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NotARepository`] when no work folder is set
    /// and `start` is outside a Git work tree.
    pub fn detect(start: &Path, environment: &Environment) -> Result<Self, WorkspaceError> {
        if let Some(work_folder) = environment.non_blank(WORK_FOLDER_VARIABLE) {
            tracing::debug!(work_folder, "using pipeline work folder");
            return Ok(Self::pipeline(work_folder));
        }
        let root = git_root(start)?;
        tracing::debug!(root = %root, "using Git work tree");
        Ok(Self {
            search_folder: root,
            pipeline: false,
        })
    }

    /// Workspace rooted at a pipeline work folder.
    #[must_use]
    pub fn pipeline(work_folder: impl Into<Utf8PathBuf>) -> Self {
        Self {
            search_folder: work_folder.into(),
            pipeline: true,
        }
    }

    /// Folder searched for collection files.
    #[must_use]
    pub fn search_folder(&self) -> &Utf8Path {
        &self.search_folder
    }

    /// Whether this is a pipeline (test agent) run.
    #[must_use]
    pub const fn is_pipeline(&self) -> bool {
        self.pipeline
    }

    /// Every collection export below the search folder.
    #[must_use]
    pub fn collection_file_paths(&self) -> Vec<Utf8PathBuf> {
        collection_files(&self.search_folder)
    }

    /// Root used for configuration discovery.
    ///
    /// An explicit root wins. A local run falls back to its work tree; a
    /// pipeline run falls back to the work tree enclosing the fallback
    /// configuration file, and finally to the work folder itself.
    #[must_use]
    pub fn configuration_root(
        &self,
        explicit: Option<&Utf8Path>,
        fallback_file: &Utf8Path,
    ) -> Utf8PathBuf {
        if let Some(root) = explicit {
            return root.to_path_buf();
        }
        if !self.pipeline {
            return self.search_folder.clone();
        }
        let fallback_dir = fallback_file
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        git_root(fallback_dir.as_std_path()).unwrap_or_else(|error| {
            tracing::debug!(%error, "fallback file is outside a Git work tree");
            self.search_folder.clone()
        })
    }
}

/// Work tree root of the repository enclosing `start`.
///
/// # Errors
///
/// Returns [`WorkspaceError::NotARepository`] when `start` is outside a work
/// tree, or [`WorkspaceError::Git`] when the root is not valid UTF-8 or
/// discovery fails for another reason.
pub fn git_root(start: &Path) -> Result<Utf8PathBuf, WorkspaceError> {
    let repo = Repository::discover(start).map_err(|error| {
        if error.code() == git2::ErrorCode::NotFound {
            WorkspaceError::NotARepository
        } else {
            WorkspaceError::from(error)
        }
    })?;
    let workdir = repo.workdir().ok_or(WorkspaceError::NotARepository)?;
    let root: PathBuf = workdir.components().collect();
    Utf8PathBuf::from_path_buf(root).map_err(|path| WorkspaceError::Git {
        message: format!("work tree path is not valid UTF-8: {}", path.display()),
    })
}
