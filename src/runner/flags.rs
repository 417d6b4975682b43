//! Operational flags read from the environment.

use crate::environment::Environment;

/// Enables verbose Newman output and the debug log file.
pub const POSTMAN_DEBUG_VARIABLE: &str = "Postman_Debug";
/// Pipeline-wide debug switch, honoured like `Postman_Debug`.
pub const SYSTEM_DEBUG_VARIABLE: &str = "System_Debug";
/// Reports the JSON output file as a result attachment.
pub const UPLOAD_OUTPUT_VARIABLE: &str = "Postman_UploadOutputFiles";
/// Keeps the JSON output file after the run.
pub const PRESERVE_OUTPUT_VARIABLE: &str = "Postman_PreserveOutputFiles";

/// Flags controlling a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerFlags {
    /// Verbose runner output plus a debug log next to the collection.
    pub debug: bool,
    /// Attach the output file to the run report.
    pub upload_output: bool,
    /// Keep the output file once the report has been read.
    pub preserve_output: bool,
}

impl RunnerFlags {
    /// Reads the flags permissively; unset or unparseable values are false.
    #[must_use]
    pub fn from_environment(environment: &Environment) -> Self {
        Self {
            debug: environment.flag(POSTMAN_DEBUG_VARIABLE)
                || environment.flag(SYSTEM_DEBUG_VARIABLE),
            upload_output: environment.flag(UPLOAD_OUTPUT_VARIABLE),
            preserve_output: environment.flag(PRESERVE_OUTPUT_VARIABLE),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::postman(POSTMAN_DEBUG_VARIABLE)]
    #[case::system(SYSTEM_DEBUG_VARIABLE)]
    fn either_debug_variable_enables_debug(#[case] variable: &str) {
        let flags = RunnerFlags::from_environment(&Environment::default().with(variable, "True"));

        assert!(flags.debug);
        assert!(!flags.upload_output);
        assert!(!flags.preserve_output);
    }

    #[rstest]
    fn unparseable_values_are_false() {
        let environment = Environment::default()
            .with(UPLOAD_OUTPUT_VARIABLE, "1")
            .with(PRESERVE_OUTPUT_VARIABLE, "yes");

        assert_eq!(
            RunnerFlags::from_environment(&environment),
            RunnerFlags::default()
        );
    }
}
