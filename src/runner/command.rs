//! Newman command construction.

use camino::Utf8Path;

/// Default Newman executable, resolved through `PATH`.
pub const DEFAULT_NEWMAN_PROGRAM: &str = "newman";

/// Program and arguments for one runner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCommand {
    /// Executable to launch.
    pub program: String,
    /// Arguments passed directly, without a shell.
    pub args: Vec<String>,
}

/// Inputs for a `newman run` invocation.
#[derive(Debug, Clone, Copy)]
pub struct NewmanInputs<'a> {
    /// Collection export.
    pub collection: &'a Utf8Path,
    /// Folder within the collection to run.
    pub folder: &'a str,
    /// Globals file.
    pub globals: Option<&'a Utf8Path>,
    /// Iteration data file.
    pub data: Option<&'a Utf8Path>,
    /// Environment file.
    pub environment: Option<&'a Utf8Path>,
    /// JSON report destination.
    pub output: &'a Utf8Path,
    /// Adds `--verbose`.
    pub verbose: bool,
}

impl RunnerCommand {
    /// Builds a single-iteration `newman run` with CLI and JSON reporters.
    #[must_use]
    pub fn newman(program: &str, inputs: NewmanInputs<'_>) -> Self {
        let mut args = vec![
            "run".to_owned(),
            inputs.collection.to_string(),
            "--folder".to_owned(),
            inputs.folder.to_owned(),
        ];
        for (flag, path) in [
            ("-g", inputs.globals),
            ("-d", inputs.data),
            ("-e", inputs.environment),
        ] {
            if let Some(path) = path {
                args.push(flag.to_owned());
                args.push(path.to_string());
            }
        }
        args.extend(
            [
                "--reporters",
                "cli,json",
                "--reporter-json-export",
                inputs.output.as_str(),
                "-n",
                "1",
            ]
            .map(str::to_owned),
        );
        if inputs.verbose {
            args.push("--verbose".to_owned());
        }

        Self {
            program: program.to_owned(),
            args,
        }
    }

    /// Human-readable command line for logs and debug output.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output file name for a collection and folder.
#[must_use]
pub fn output_file_name(collection_name: &str, folder: &str) -> String {
    format!("output_{collection_name}_{folder}.json")
}

/// Debug log file name for a collection and folder.
#[must_use]
pub fn debug_file_name(collection_name: &str, folder: &str) -> String {
    format!("newman_debug_{collection_name}_{folder}.log")
}
