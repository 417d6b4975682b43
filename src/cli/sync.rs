//! Test Case synchronisation mode.

use camino::{Utf8Path, Utf8PathBuf};
use postman_ado::workspace::git_root;
use postman_ado::{
    AdoWorkItemStore, AppError, AppSettings, ConfigurationResolver, Environment,
    ManifestEnumerator, ReconciliationResult, TestEnumerator, WorkItemError, WorkItemReconciler,
    Workspace,
};

use super::output::write_sync_summary;

/// Reconciles the manifest's tests with ADO Test Case work items.
///
/// Returns `true` when no identifier failed.
///
/// # Errors
///
/// Returns [`AppError`] when the configuration, token, store, or manifest
/// cannot be set up. Per-test failures are reported in the summary instead.
pub async fn run(settings: &AppSettings, environment: &Environment) -> Result<bool, AppError> {
    let start = super::current_dir()?;
    let fallback = Utf8PathBuf::from(settings.config_file.as_str());
    let root = configuration_root(settings, environment, &start, &fallback)?;

    let configuration = ConfigurationResolver::default().resolve(
        root.as_std_path(),
        fallback.as_std_path(),
        environment,
    )?;
    tracing::info!(summary = %configuration.summary(0), "resolved configuration");

    let url = configuration
        .connection
        .url()?
        .ok_or_else(|| WorkItemError::InvalidUrl("connection URL is not configured".to_owned()))?;
    let token = settings.resolve_token(environment)?;
    let store = AdoWorkItemStore::new(url, token, settings.request_timeout())?;

    let identifiers = ManifestEnumerator::new(settings.manifest.as_str()).enumerate()?;
    tracing::info!(count = identifiers.len(), "reconciling automated tests");

    let outcomes = WorkItemReconciler::new(&configuration, &store)
        .reconcile(&identifiers)
        .await;
    write_sync_summary(&outcomes)?;

    Ok(!outcomes
        .iter()
        .any(|outcome| matches!(outcome.result, ReconciliationResult::Failed(_))))
}

fn configuration_root(
    settings: &AppSettings,
    environment: &Environment,
    start: &std::path::Path,
    fallback: &Utf8Path,
) -> Result<Utf8PathBuf, AppError> {
    match Workspace::detect(start, environment) {
        Ok(workspace) => {
            for path in workspace.collection_file_paths() {
                tracing::info!(%path, "collection file");
            }
            Ok(workspace.configuration_root(settings.root_dir(), fallback))
        }
        Err(error) => {
            if let Some(root) = settings.root_dir() {
                return Ok(root.to_path_buf());
            }
            let fallback_dir = fallback
                .parent()
                .filter(|parent| !parent.as_str().is_empty())
                .unwrap_or_else(|| Utf8Path::new("."));
            git_root(fallback_dir.as_std_path()).map_err(|_| AppError::from(error))
        }
    }
}
