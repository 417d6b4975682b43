//! Postman to Azure DevOps test case synchronisation.
//!
//! The library resolves the Azure DevOps project configuration, reconciles
//! automated Postman tests with ADO "Test Case" work items, and runs Postman
//! collections through Newman, mapping the JSON report to a test outcome.

pub mod config;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod project;
pub mod runner;
pub mod workitems;
pub mod workspace;

pub use config::{AppSettings, OperationMode};
pub use environment::Environment;
pub use error::AppError;
pub use manifest::{EnumerationError, ManifestEnumerator, TestEnumerator};
pub use project::{ConfigurationError, ConfigurationResolver, ProjectConfiguration};
pub use runner::{
    CollectionOutcome, CollectionRun, CollectionRunReport, CollectionRunner, RunAttachment,
    RunnerError, RunnerFlags, SystemCollectionRunner,
};
pub use workitems::{
    AccessToken, AdoWorkItemStore, ReconciliationOutcome, ReconciliationResult, TestIdentifier,
    WorkItemError, WorkItemReconciler, WorkItemStore,
};
pub use workspace::{Workspace, WorkspaceError};
