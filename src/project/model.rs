//! Project configuration values.

use std::fmt;

use serde::Deserialize;
use url::Url;

use super::error::ConfigurationError;

/// Connection, project, and test case defaults for Azure DevOps.
///
/// Deserialises from the JSON form of the configuration document once
/// [`super::parse::parse_json`] has lowercased its property names; the XML
/// form is read by [`super::parse::parse_xml`] into the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfiguration {
    /// Remote endpoint and target project.
    #[serde(rename = "connection")]
    pub connection: ProjectConnection,
    /// Defaults applied to reconciled Test Case work items.
    #[serde(rename = "testcase")]
    pub test_case: ProjectTestCase,
}

/// Azure DevOps organisation endpoint and team project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConnection {
    /// Raw organisation URL as written in the configuration.
    #[serde(rename = "url")]
    pub url: String,
    /// Team project name.
    #[serde(rename = "project")]
    pub project: String,
}

impl ProjectConnection {
    /// Parses the raw URL.
    ///
    /// A blank raw value yields `None` rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] when the value is not an
    /// absolute URL.
    pub fn url(&self) -> Result<Option<Url>, ConfigurationError> {
        let raw = self.url.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Url::parse(raw)
            .map(Some)
            .map_err(|error| ConfigurationError::InvalidUrl {
                value: raw.to_owned(),
                message: error.to_string(),
            })
    }
}

/// Test case defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectTestCase {
    /// Area path assigned to test cases.
    #[serde(rename = "areapath")]
    pub area_path: String,
    /// Additional fields and their default values, in document order.
    #[serde(rename = "customfields")]
    pub custom_fields: Vec<CustomField>,
}

/// A work item field set to a fixed value on every reconciled test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomField {
    /// Field reference name, e.g. `Custom.Team`.
    #[serde(rename = "id")]
    pub id: String,
    /// Value written to the field.
    #[serde(rename = "defaultvalue")]
    pub default_value: String,
}

impl CustomField {
    /// Creates a custom field entry.
    #[must_use]
    pub fn new(id: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            default_value: default_value.into(),
        }
    }
}

impl ProjectConfiguration {
    /// Renders an indented, human readable summary for logs.
    #[must_use]
    pub fn summary(&self, indent_size: usize) -> String {
        Summary {
            configuration: self,
            indent: " ".repeat(indent_size),
        }
        .to_string()
    }
}

struct Summary<'a> {
    configuration: &'a ProjectConfiguration,
    indent: String,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = &self.indent;
        let ProjectConfiguration {
            connection,
            test_case,
        } = self.configuration;
        writeln!(out, "{indent}- Connection:")?;
        writeln!(out, "{indent}| - Url: {}", connection.url)?;
        writeln!(out, "{indent}| - Project: {}", connection.project)?;
        writeln!(out, "{indent}- TestCase:")?;
        writeln!(out, "{indent}| - AreaPath: {}", test_case.area_path)?;
        writeln!(out, "{indent}| - CustomFields:")?;
        for field in &test_case.custom_fields {
            writeln!(out, "{indent}| | - Id: {}", field.id)?;
            writeln!(out, "{indent}| | - DefaultValue: {}", field.default_value)?;
        }
        Ok(())
    }
}

impl fmt::Display for ProjectConfiguration {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = Summary {
            configuration: self,
            indent: String::new(),
        };
        fmt::Display::fmt(&summary, formatter)
    }
}
