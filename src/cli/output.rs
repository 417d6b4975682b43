//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use postman_ado::runner::CollectionRunReport;
use postman_ado::workitems::SkipReason;
use postman_ado::{AppError, CollectionOutcome, ReconciliationOutcome, ReconciliationResult};

/// Counts of reconciliation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncTally {
    /// Work items created.
    pub created: usize,
    /// Work items patched.
    pub updated: usize,
    /// Work items already up to date.
    pub unchanged: usize,
    /// Identifiers skipped.
    pub skipped: usize,
    /// Identifiers that failed.
    pub failed: usize,
}

impl SyncTally {
    /// Tallies a batch of outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[ReconciliationOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut tally, outcome| {
                match outcome.result {
                    ReconciliationResult::Created(_) => tally.created += 1,
                    ReconciliationResult::Updated(_) => tally.updated += 1,
                    ReconciliationResult::AlreadyUpToDate(_) => tally.unchanged += 1,
                    ReconciliationResult::Skipped(_) => tally.skipped += 1,
                    ReconciliationResult::Failed(_) => tally.failed += 1,
                }
                tally
            })
    }
}

/// Writes one line per outcome plus a totals line to stdout.
///
/// # Errors
///
/// Returns [`AppError::Io`] when stdout cannot be written.
pub fn write_sync_summary(outcomes: &[ReconciliationOutcome]) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    write_sync_summary_to(&mut stdout, outcomes)
}

/// Writes one line per outcome plus a totals line to the given writer.
///
/// # Errors
///
/// Returns [`AppError::Io`] when the writer fails.
pub fn write_sync_summary_to<W: Write>(
    writer: &mut W,
    outcomes: &[ReconciliationOutcome],
) -> Result<(), AppError> {
    for outcome in outcomes {
        let detail = match &outcome.result {
            ReconciliationResult::Created(id) => format!("created Test Case {id}"),
            ReconciliationResult::Updated(id) => format!("updated Test Case {id}"),
            ReconciliationResult::AlreadyUpToDate(id) => format!("Test Case {id} up to date"),
            ReconciliationResult::Skipped(SkipReason::AmbiguousMatch { matches }) => {
                format!("skipped: {matches} Test Cases share this title")
            }
            ReconciliationResult::Failed(failure) => format!("failed: {failure}"),
        };
        writeln!(writer, "  {}: {detail}", outcome.qualified_name).map_err(|e| io_error(&e))?;
    }

    let tally = SyncTally::from_outcomes(outcomes);
    writeln!(
        writer,
        "{} created, {} updated, {} unchanged, {} skipped, {} failed",
        tally.created, tally.updated, tally.unchanged, tally.skipped, tally.failed
    )
    .map_err(|e| io_error(&e))
}

/// Writes the result of a collection run to stdout.
///
/// # Errors
///
/// Returns [`AppError::Io`] when stdout cannot be written.
pub fn write_run_summary(
    collection: &str,
    folder: &str,
    report: &CollectionRunReport,
) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    write_run_summary_to(&mut stdout, collection, folder, report)
}

/// Writes the result of a collection run to the given writer.
///
/// # Errors
///
/// Returns [`AppError::Io`] when the writer fails.
pub fn write_run_summary_to<W: Write>(
    writer: &mut W,
    collection: &str,
    folder: &str,
    report: &CollectionRunReport,
) -> Result<(), AppError> {
    match &report.outcome {
        CollectionOutcome::Passed => {
            writeln!(writer, "{collection}/{folder}: passed").map_err(|e| io_error(&e))?;
        }
        CollectionOutcome::Failed { failures } => {
            writeln!(
                writer,
                "{collection}/{folder}: failed ({} failures)",
                failures.len()
            )
            .map_err(|e| io_error(&e))?;
            for failure in failures {
                writeln!(writer, "  {failure}").map_err(|e| io_error(&e))?;
            }
        }
        CollectionOutcome::Inconclusive { debug_info } => {
            writeln!(writer, "{collection}/{folder}: inconclusive, no activity recorded")
                .map_err(|e| io_error(&e))?;
            writeln!(writer, "{debug_info}").map_err(|e| io_error(&e))?;
        }
    }

    for attachment in &report.attachments {
        writeln!(writer, "attachment: {}", attachment.path).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn io_error(error: &io::Error) -> AppError {
    AppError::Io {
        message: error.to_string(),
    }
}
