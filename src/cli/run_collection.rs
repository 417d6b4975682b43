//! Collection run mode.

use postman_ado::runner::RunnerFlags;
use postman_ado::workspace::WORK_FOLDER_VARIABLE;
use postman_ado::{
    AppError, AppSettings, CollectionRun, Environment, SystemCollectionRunner, Workspace,
};

use super::output::write_run_summary;

/// Runs the configured collection folder through Newman.
///
/// Returns `true` when the run passed.
///
/// # Errors
///
/// Returns [`AppError::Settings`] when no collection or folder is
/// configured, [`AppError::Workspace`] when the search folder cannot be
/// determined, and [`AppError::Runner`] when the run ends without an outcome.
pub fn run(settings: &AppSettings, environment: &Environment) -> Result<bool, AppError> {
    let collection = settings
        .collection
        .as_deref()
        .ok_or_else(|| AppError::Settings {
            message: "collection name is required (use --collection or -c)".to_owned(),
        })?;
    let folder = settings.require_folder()?;
    let workspace = Workspace::detect(&super::current_dir()?, environment)?;

    let mut run = CollectionRun::new(collection, folder, workspace.search_folder())
        .with_program(settings.newman_path.as_str())
        .with_flags(RunnerFlags::from_environment(environment));
    if let Some(selectors) = settings.dataline.as_deref() {
        run = run.with_dataline(selectors);
    }
    if let Some(work_folder) = environment.non_blank(WORK_FOLDER_VARIABLE) {
        run = run.with_work_folder(work_folder);
    }

    let report = run.execute(&SystemCollectionRunner)?;
    write_run_summary(collection, folder, &report)?;
    Ok(report.outcome.is_passed())
}
