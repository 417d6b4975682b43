//! Collection file location and companion file discovery.

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use super::error::RunnerError;

/// Suffix shared by every Postman collection export.
pub const COLLECTION_FILE_SUFFIX: &str = ".postman_collection.json";

/// File name of a collection export, e.g. `Orders.postman_collection.json`.
#[must_use]
pub fn collection_file_name(collection_name: &str) -> String {
    format!("{collection_name}{COLLECTION_FILE_SUFFIX}")
}

/// Lists every collection export below `search_folder`, sorted by path.
#[must_use]
pub fn collection_files(search_folder: &Utf8Path) -> Vec<Utf8PathBuf> {
    find_files(search_folder, |name| name.ends_with(COLLECTION_FILE_SUFFIX))
}

/// Finds the single collection file named `file_name` below `search_folder`.
///
/// # Errors
///
/// Returns [`RunnerError::CollectionNotFound`] when there is no match and
/// [`RunnerError::AmbiguousCollection`] when there are several.
pub fn locate_collection(
    search_folder: &Utf8Path,
    file_name: &str,
) -> Result<Utf8PathBuf, RunnerError> {
    let mut matches = find_files(search_folder, |name| name == file_name);
    match matches.len() {
        0 => Err(RunnerError::CollectionNotFound {
            file_name: file_name.to_owned(),
            search_folder: search_folder.to_path_buf(),
        }),
        1 => matches.pop().ok_or_else(|| RunnerError::CollectionNotFound {
            file_name: file_name.to_owned(),
            search_folder: search_folder.to_path_buf(),
        }),
        _ => Err(RunnerError::AmbiguousCollection {
            file_name: file_name.to_owned(),
            paths: matches,
        }),
    }
}

fn find_files(search_folder: &Utf8Path, accept: impl Fn(&str) -> bool) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = WalkDir::new(search_folder)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(&accept))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .collect();
    files.sort();
    files
}

/// A collection export and the companion files found next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFiles {
    /// The collection export.
    pub collection: Utf8PathBuf,
    /// Environment file passed with `-e`.
    pub environment: Option<Utf8PathBuf>,
    /// Globals file passed with `-g`.
    pub globals: Option<Utf8PathBuf>,
    /// Iteration data file passed with `-d`.
    pub data: Option<Utf8PathBuf>,
}

impl CollectionFiles {
    /// Looks for companion files in the collection's folder.
    ///
    /// Companions share the collection's stem: the file name up to its
    /// first `.`. Candidates are tried in order and the first existing file
    /// wins.
    #[must_use]
    pub fn discover(collection: Utf8PathBuf) -> Self {
        let folder = collection.parent().map(Utf8Path::to_path_buf).unwrap_or_default();
        let stem = collection
            .file_name()
            .and_then(|name| name.split('.').next())
            .unwrap_or_default()
            .to_owned();

        let data = first_existing(
            &folder,
            &[format!("{stem}.data.csv"), format!("{stem}.data.json")],
        );
        let environment = first_existing(
            &folder,
            &[
                format!("{stem}.postman_environment.json"),
                format!("{stem}.environment.json"),
                ".postman_environment.json".to_owned(),
            ],
        );
        let globals = first_existing(
            &folder,
            &[
                format!("{stem}.postman_globals.json"),
                format!("{stem}.globals.json"),
                ".postman_globals.json".to_owned(),
            ],
        );

        Self {
            collection,
            environment,
            globals,
            data,
        }
    }

    /// Folder holding the collection export.
    #[must_use]
    pub fn folder(&self) -> &Utf8Path {
        self.collection.parent().unwrap_or_else(|| Utf8Path::new(""))
    }
}

fn first_existing(folder: &Utf8Path, candidates: &[String]) -> Option<Utf8PathBuf> {
    candidates
        .iter()
        .map(|name| folder.join(name))
        .find(|path| path.is_file())
}
