//! Discovery of the topmost configuration file below a search root.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::error::ConfigurationError;

/// Extensions accepted for configuration files.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["json", "xml"];

/// File and folder name patterns used during discovery.
///
/// Both patterns are prefix globs (`AzureDevOps.*`, `Config*`) matched
/// ASCII case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPatterns {
    /// Prefix of configuration file names.
    pub file_prefix: String,
    /// Prefix of child folders scanned when the root has no match.
    pub folder_prefix: String,
}

impl Default for DiscoveryPatterns {
    fn default() -> Self {
        Self {
            file_prefix: "AzureDevOps.".to_owned(),
            folder_prefix: "Config".to_owned(),
        }
    }
}

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

/// Finds the configuration file to load below `root`.
///
/// The top level of `root` is searched first. Without a match there, child
/// folders matching the folder pattern are scanned in name order and the
/// first folder with any match wins. Within the winning folder the most
/// recently modified file is chosen; equal timestamps fall back to file name
/// order.
///
/// # Errors
///
/// Returns [`ConfigurationError::Io`] when a directory cannot be listed.
pub fn find_topmost_configuration_file(
    root: &Path,
    patterns: &DiscoveryPatterns,
) -> Result<Option<PathBuf>, ConfigurationError> {
    let root_candidates = configuration_files(root, &patterns.file_prefix)?;
    if let Some(path) = most_recent(root_candidates) {
        return Ok(Some(path));
    }

    for directory in child_folders(root, &patterns.folder_prefix)? {
        let candidates = configuration_files(&directory, &patterns.file_prefix)?;
        if !candidates.is_empty() {
            return Ok(most_recent(candidates));
        }
    }

    Ok(None)
}

fn configuration_files(
    directory: &Path,
    file_prefix: &str,
) -> Result<Vec<Candidate>, ConfigurationError> {
    let mut candidates = Vec::new();
    for entry in read_dir(directory)? {
        let entry = entry.map_err(|error| io_error(directory, &error))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
            continue;
        };
        if !path.is_file() || !has_prefix(&name, file_prefix) || !has_supported_extension(&path) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .map_err(|error| io_error(&path, &error))?;
        tracing::debug!(
            candidate = %path.display(),
            modified = %DateTime::<Utc>::from(modified).to_rfc3339(),
            "configuration candidate"
        );
        candidates.push(Candidate {
            path,
            name,
            modified,
        });
    }
    Ok(candidates)
}

fn child_folders(root: &Path, folder_prefix: &str) -> Result<Vec<PathBuf>, ConfigurationError> {
    let mut folders = Vec::new();
    for entry in read_dir(root)? {
        let entry = entry.map_err(|error| io_error(root, &error))?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| has_prefix(name, folder_prefix));
        if matches && path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();
    Ok(folders)
}

fn most_recent(mut candidates: Vec<Candidate>) -> Option<PathBuf> {
    candidates.sort_by(|left, right| {
        (Reverse(left.modified), &left.name).cmp(&(Reverse(right.modified), &right.name))
    });
    candidates.into_iter().next().map(|candidate| candidate.path)
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| extension.eq_ignore_ascii_case(supported))
        })
}

fn read_dir(directory: &Path) -> Result<fs::ReadDir, ConfigurationError> {
    fs::read_dir(directory).map_err(|error| io_error(directory, &error))
}

fn io_error(path: &Path, error: &std::io::Error) -> ConfigurationError {
    ConfigurationError::Io {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
