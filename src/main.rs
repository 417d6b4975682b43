//! postman-ado CLI entrypoint.
//!
//! Without a collection the binary synchronises Test Case work items; with
//! `--collection` and `--folder` it runs that collection folder through
//! Newman.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use postman_ado::runner::RunnerFlags;
use postman_ado::{AppError, AppSettings, Environment, OperationMode};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, AppError> {
    let settings = load_settings()?;
    let environment = Environment::from_process();
    cli::logging::init(RunnerFlags::from_environment(&environment).debug);

    match settings.operation_mode() {
        OperationMode::SyncTestCases => cli::sync::run(&settings, &environment).await,
        OperationMode::RunCollection => cli::run_collection::run(&settings, &environment),
    }
}

/// Loads settings from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`AppError::Settings`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_settings() -> Result<AppSettings, AppError> {
    AppSettings::load().map_err(|error| AppError::Settings {
        message: error.to_string(),
    })
}
