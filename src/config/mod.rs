//! Application settings loaded from CLI, environment, and files.
//!
//! Settings merge the usual ortho-config layers, lowest to highest:
//!
//! 1. **Defaults** – built-in values
//! 2. **Configuration file** – `.postman-ado.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `POSTMAN_ADO_*`, plus the pipeline's
//!    `SYSTEM_ACCESSTOKEN` for the access token
//! 4. **Command-line arguments**
//!
//! ```toml
//! root_dir = "tests/api"
//! config_file = "AzureDevOps.xml"
//! manifest = "tests.manifest.json"
//! newman_path = "/usr/local/bin/newman"
//! ```
//!
//! Project settings such as the organisation URL live in the `AzureDevOps.*`
//! configuration files, not here.

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::error::AppError;
use crate::project::BASE_CONFIGURATION_FILE_NAME;
use crate::runner::DEFAULT_NEWMAN_PROGRAM;
use crate::workitems::{AccessToken, WorkItemError};

/// Pipeline variable carrying the job's access token.
pub const SYSTEM_ACCESS_TOKEN_VARIABLE: &str = "SYSTEM_ACCESSTOKEN";

const DEFAULT_MANIFEST: &str = "tests.manifest.json";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// What the binary does for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Reconcile manifest tests with ADO Test Case work items.
    SyncTestCases,
    /// Run one collection folder through Newman.
    RunCollection,
}

/// Application settings supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use postman_ado::AppSettings;
///
/// let settings = AppSettings::load().expect("failed to load settings");
/// println!("{:?}", settings.operation_mode());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "POSTMAN_ADO",
    discovery(
        dotfile_name = ".postman-ado.toml",
        config_file_name = "postman-ado.toml",
        app_name = "postman-ado"
    )
)]
pub struct AppSettings {
    /// Directory searched for `AzureDevOps.*` configuration files.
    ///
    /// Defaults to the workspace's Git work tree.
    #[ortho_config(cli_short = 'r')]
    pub root_dir: Option<String>,

    /// Configuration file used when discovery finds nothing.
    #[ortho_config(cli_short = 'C')]
    pub config_file: String,

    /// JSON manifest listing the automated tests to synchronise.
    #[ortho_config(cli_short = 'm')]
    pub manifest: String,

    /// Personal access token for the ADO REST API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `POSTMAN_ADO_TOKEN` or `SYSTEM_ACCESSTOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Collection to run, without the `.postman_collection.json` suffix.
    ///
    /// Setting it switches to collection run mode.
    #[ortho_config(cli_short = 'c')]
    pub collection: Option<String>,

    /// Folder within the collection to run.
    #[ortho_config(cli_short = 'f')]
    pub folder: Option<String>,

    /// `;`-separated selectors narrowing CSV iteration data.
    #[ortho_config(cli_short = 'd')]
    pub dataline: Option<String>,

    /// Newman executable.
    #[ortho_config(cli_short = 'N')]
    pub newman_path: String,

    /// Timeout for each ADO HTTP request, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            root_dir: None,
            config_file: BASE_CONFIGURATION_FILE_NAME.to_owned(),
            manifest: DEFAULT_MANIFEST.to_owned(),
            token: None,
            collection: None,
            folder: None,
            dataline: None,
            newman_path: DEFAULT_NEWMAN_PROGRAM.to_owned(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl AppSettings {
    /// Determines the operation mode.
    ///
    /// A configured collection selects `RunCollection`; anything else
    /// synchronises test cases.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.collection.is_some() {
            OperationMode::RunCollection
        } else {
            OperationMode::SyncTestCases
        }
    }

    /// Resolves the access token from settings or `SYSTEM_ACCESSTOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemError::MissingToken`] when neither source holds a
    /// non-blank value.
    pub fn resolve_token(&self, environment: &Environment) -> Result<AccessToken, WorkItemError> {
        let configured = self
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty());
        let token = configured
            .or_else(|| environment.non_blank(SYSTEM_ACCESS_TOKEN_VARIABLE))
            .ok_or(WorkItemError::MissingToken)?;
        AccessToken::new(token)
    }

    /// Returns the collection folder or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Settings`] when no folder is configured.
    pub fn require_folder(&self) -> Result<&str, AppError> {
        self.folder
            .as_deref()
            .filter(|folder| !folder.trim().is_empty())
            .ok_or_else(|| AppError::Settings {
                message: "collection folder is required (use --folder or -f)".to_owned(),
            })
    }

    /// Explicit configuration search root, when set.
    #[must_use]
    pub fn root_dir(&self) -> Option<&Utf8Path> {
        self.root_dir
            .as_deref()
            .filter(|root| !root.trim().is_empty())
            .map(Utf8Path::new)
    }

    /// Request timeout as a [`std::time::Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests;
