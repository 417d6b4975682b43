//! Azure DevOps project configuration.
//!
//! The configuration document names the organisation URL, the team project,
//! and the defaults applied to Test Case work items. It is discovered below a
//! search root (see [`discovery`]), parsed as JSON or XML depending on its
//! extension, and finally patched from the environment:
//!
//! - `Connection_Url` replaces the connection URL
//! - `Connection_Project` replaces the team project
//! - `TestCase_AreaPath` replaces the test case area path
//!
//! Blank variables leave the file value untouched.
//!
//! ```xml
//! <Data>
//!   <Connection>
//!     <Url>https://dev.azure.com/contoso</Url>
//!     <Project>Payments</Project>
//!   </Connection>
//!   <TestCase>
//!     <AreaPath>Payments\Api</AreaPath>
//!     <CustomFields>
//!       <CustomField id="Custom.Team" defaultvalue="Checkout" />
//!     </CustomFields>
//!   </TestCase>
//! </Data>
//! ```

pub mod discovery;
pub mod error;
pub mod model;
pub mod parse;

use std::fs;
use std::path::Path;

pub use discovery::DiscoveryPatterns;
pub use error::ConfigurationError;
pub use model::{CustomField, ProjectConfiguration, ProjectConnection, ProjectTestCase};

use crate::environment::Environment;

/// Name of the configuration file used when discovery finds nothing.
pub const BASE_CONFIGURATION_FILE_NAME: &str = "AzureDevOps.xml";
/// Overrides the connection URL.
pub const CONNECTION_URL_VARIABLE: &str = "Connection_Url";
/// Overrides the team project.
pub const CONNECTION_PROJECT_VARIABLE: &str = "Connection_Project";
/// Overrides the test case area path.
pub const TEST_CASE_AREA_PATH_VARIABLE: &str = "TestCase_AreaPath";

/// Locates, loads, and overrides the project configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationResolver {
    patterns: DiscoveryPatterns,
}

impl ConfigurationResolver {
    /// Creates a resolver using the given discovery patterns.
    #[must_use]
    pub const fn with_patterns(patterns: DiscoveryPatterns) -> Self {
        Self { patterns }
    }

    /// Resolves the configuration for a run.
    ///
    /// Discovery starts at `root`; when nothing matches, `fallback` is
    /// loaded instead. Environment overrides are applied last and the
    /// resulting connection URL is validated.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::NotFound`] when neither a discovered file
    ///   nor the fallback exists
    /// - [`ConfigurationError::Parse`] when the selected file is malformed
    /// - [`ConfigurationError::InvalidUrl`] when the resolved URL is not
    ///   absolute
    /// - [`ConfigurationError::Io`] when a directory or file cannot be read
    pub fn resolve(
        &self,
        root: &Path,
        fallback: &Path,
        environment: &Environment,
    ) -> Result<ProjectConfiguration, ConfigurationError> {
        tracing::info!(root = %root.display(), "configuration root directory");
        let discovered = if root.is_dir() {
            discovery::find_topmost_configuration_file(root, &self.patterns)?
        } else {
            None
        };
        let path = discovered.unwrap_or_else(|| fallback.to_path_buf());
        if !path.is_file() {
            return Err(ConfigurationError::NotFound { path });
        }
        tracing::info!(file = %path.display(), "configuration file");

        let configuration = load_file(&path)?.with_overrides(environment);
        configuration.connection.url()?;
        Ok(configuration)
    }
}

/// Loads a configuration file, choosing the parser from its extension.
///
/// `.json` (any case) uses the JSON parser; everything else is read as XML.
///
/// # Errors
///
/// Returns [`ConfigurationError::Io`] when the file cannot be read and
/// [`ConfigurationError::Parse`] when its content is malformed.
pub fn load_file(path: &Path) -> Result<ProjectConfiguration, ConfigurationError> {
    let text = fs::read_to_string(path).map_err(|error| ConfigurationError::Io {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    let is_json = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        parse::parse_json(&text)
    } else {
        parse::parse_xml(&text)
    };
    parsed.map_err(|message| ConfigurationError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

impl ProjectConfiguration {
    /// Applies the environment overrides.
    ///
    /// Each non-blank override variable replaces its field unconditionally.
    #[must_use]
    pub fn with_overrides(mut self, environment: &Environment) -> Self {
        if let Some(url) = environment.non_blank(CONNECTION_URL_VARIABLE) {
            url.clone_into(&mut self.connection.url);
        }
        if let Some(project) = environment.non_blank(CONNECTION_PROJECT_VARIABLE) {
            project.clone_into(&mut self.connection.project);
        }
        if let Some(area_path) = environment.non_blank(TEST_CASE_AREA_PATH_VARIABLE) {
            area_path.clone_into(&mut self.test_case.area_path);
        }
        self
    }
}

#[cfg(test)]
mod tests;
