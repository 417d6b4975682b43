//! Newman JSON report parsing.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct NewmanReport {
    run: NewmanRun,
}

#[derive(Debug, Deserialize)]
struct NewmanRun {
    #[serde(default)]
    failures: Vec<Value>,
    #[serde(default)]
    stats: NewmanStats,
}

#[derive(Debug, Default, Deserialize)]
struct NewmanStats {
    #[serde(default)]
    iterations: StatCounter,
    #[serde(default)]
    items: StatCounter,
    #[serde(default)]
    requests: StatCounter,
    #[serde(default)]
    tests: StatCounter,
}

#[derive(Debug, Default, Deserialize)]
struct StatCounter {
    #[serde(default)]
    total: u64,
}

/// The parts of a Newman report that decide the run outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Each failure entry rendered as compact JSON.
    pub failures: Vec<String>,
    /// Sum of iteration, item, request, and test totals.
    pub activity: u64,
}

/// Parses a Newman JSON report.
///
/// # Errors
///
/// Returns the parser message when the text is not a report with a `run`
/// object.
pub fn parse_report(text: &str) -> Result<RunSummary, String> {
    let report: NewmanReport = serde_json::from_str(text).map_err(|error| error.to_string())?;
    let stats = report.run.stats;
    let activity = [stats.iterations, stats.items, stats.requests, stats.tests]
        .iter()
        .fold(0_u64, |sum, counter| sum.saturating_add(counter.total));
    let failures = report
        .run
        .failures
        .iter()
        .map(Value::to_string)
        .collect();

    Ok(RunSummary {
        failures,
        activity,
    })
}
