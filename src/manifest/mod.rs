//! Enumeration of automated tests from a test manifest.
//!
//! A test project publishes a JSON manifest next to its binary describing
//! every method annotated as an automated test:
//!
//! ```json
//! {
//!   "storage": "Postman.Wrapper.dll",
//!   "tests": [
//!     { "type": "Postman.Wrapper.LoginTests", "method": "ValidLogin",
//!       "properties": [["AdoId", 42]] }
//!   ]
//! }
//! ```
//!
//! The first `AdoId` property pins the test to an existing work item.

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::workitems::TestIdentifier;

/// Property name carrying a pinned work item id.
pub const LINKED_ID_PROPERTY: &str = "AdoId";

/// Errors raised while enumerating tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnumerationError {
    /// The manifest could not be read.
    #[error("failed to read test manifest {}: {message}", path.display())]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("failed to parse test manifest: {message}")]
    Parse {
        /// Parser error detail.
        message: String,
    },

    /// An `AdoId` property is not an integer.
    #[error("test {test} has a non-numeric AdoId value: {value}")]
    InvalidLinkedId {
        /// Qualified test name.
        test: String,
        /// Offending value.
        value: String,
    },
}

/// Source of automated test identifiers.
pub trait TestEnumerator {
    /// Returns the tests in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`EnumerationError`] when the source cannot be read.
    fn enumerate(&self) -> Result<Vec<TestIdentifier>, EnumerationError>;
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    storage: String,
    #[serde(default)]
    tests: Vec<ManifestTest>,
}

#[derive(Debug, Deserialize)]
struct ManifestTest {
    #[serde(rename = "type")]
    declaring_type: String,
    method: String,
    storage: Option<String>,
    #[serde(default)]
    properties: Vec<(String, Value)>,
}

/// Enumerates tests from a manifest file on disk.
#[derive(Debug, Clone)]
pub struct ManifestEnumerator {
    path: PathBuf,
}

impl ManifestEnumerator {
    /// Creates an enumerator for the manifest at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Manifest location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TestEnumerator for ManifestEnumerator {
    fn enumerate(&self) -> Result<Vec<TestIdentifier>, EnumerationError> {
        let text = fs::read_to_string(&self.path).map_err(|error| EnumerationError::Io {
            path: self.path.clone(),
            message: error.to_string(),
        })?;
        parse_manifest(&text)
    }
}

/// Parses manifest text into identifiers.
///
/// # Errors
///
/// Returns [`EnumerationError::Parse`] for malformed JSON and
/// [`EnumerationError::InvalidLinkedId`] for non-numeric `AdoId` values and
/// positive values beyond the work item id range.
pub fn parse_manifest(text: &str) -> Result<Vec<TestIdentifier>, EnumerationError> {
    let manifest: Manifest =
        serde_json::from_str(text).map_err(|error| EnumerationError::Parse {
            message: error.to_string(),
        })?;

    manifest
        .tests
        .into_iter()
        .map(|test| {
            let storage = test.storage.as_deref().unwrap_or(&manifest.storage);
            let identifier =
                TestIdentifier::from_method(&test.declaring_type, &test.method, storage);
            match linked_id(&test, identifier.qualified_name())? {
                Some(id) => Ok(identifier.with_linked_id(id)),
                None => Ok(identifier),
            }
        })
        .collect()
}

/// Reads the first `AdoId` property; zero and negative ids mean "not linked".
fn linked_id(
    test: &ManifestTest,
    qualified_name: &str,
) -> Result<Option<NonZeroU32>, EnumerationError> {
    let Some((_, value)) = test
        .properties
        .iter()
        .find(|(name, _)| name == LINKED_ID_PROPERTY)
    else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    let invalid = || EnumerationError::InvalidLinkedId {
        test: qualified_name.to_owned(),
        value: value.to_string(),
    };
    let raw = parsed.ok_or_else(invalid)?;
    if raw <= 0 {
        return Ok(None);
    }
    u32::try_from(raw)
        .ok()
        .and_then(NonZeroU32::new)
        .map(Some)
        .ok_or_else(invalid)
}
