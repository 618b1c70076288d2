//! Rendering of benchmark outcomes for stdout.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::benchmark::{BenchmarkOutcome, BenchmarkStats, Comparison};
use crate::series::Formulation;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format report")]
    Fmt(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn result_line(value: f64) -> String {
    format!("Result: {value:.12}")
}

pub fn time_line(elapsed: Duration) -> String {
    format!("Execution Time: {:.6} seconds", elapsed.as_secs_f64())
}

/// Timing summary in seconds, for machine-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub runs: usize,
    pub mean_seconds: f64,
    pub median_seconds: f64,
    pub std_dev_seconds: f64,
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub p50_seconds: f64,
    pub p90_seconds: f64,
    pub p95_seconds: f64,
    pub p99_seconds: f64,
}

impl From<&BenchmarkStats> for StatsReport {
    fn from(stats: &BenchmarkStats) -> Self {
        Self {
            runs: stats.runs,
            mean_seconds: stats.mean.as_secs_f64(),
            median_seconds: stats.median.as_secs_f64(),
            std_dev_seconds: stats.std_dev.as_secs_f64(),
            min_seconds: stats.min.as_secs_f64(),
            max_seconds: stats.max.as_secs_f64(),
            p50_seconds: stats.p50.as_secs_f64(),
            p90_seconds: stats.p90.as_secs_f64(),
            p95_seconds: stats.p95.as_secs_f64(),
            p99_seconds: stats.p99.as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub formulation: Formulation,
    pub iterations: u64,
    pub result: f64,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stats: Option<StatsReport>,
}

impl From<&BenchmarkOutcome> for RunReport {
    fn from(outcome: &BenchmarkOutcome) -> Self {
        let measurement = outcome.representative();
        Self {
            formulation: outcome.formulation,
            iterations: outcome.iterations,
            result: measurement.value,
            elapsed_seconds: measurement.elapsed.as_secs_f64(),
            stats: (outcome.stats.runs > 1).then(|| StatsReport::from(&outcome.stats)),
        }
    }
}

/// The result and timing lines, followed by a stats block when more than one run
/// was measured.
pub fn render_text(outcome: &BenchmarkOutcome) -> Result<String, ReportError> {
    let measurement = outcome.representative();
    let mut out = String::new();
    writeln!(out, "{}", result_line(measurement.value))?;
    writeln!(out, "{}", time_line(measurement.elapsed))?;
    if outcome.stats.runs > 1 {
        writeln!(out)?;
        writeln!(out, "{}", outcome.stats)?;
    }
    Ok(out)
}

pub fn render_json(outcome: &BenchmarkOutcome) -> Result<String, ReportError> {
    let mut json = serde_json::to_string_pretty(&RunReport::from(outcome))?;
    json.push('\n');
    Ok(json)
}

pub fn render(outcome: &BenchmarkOutcome, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => render_text(outcome),
        OutputFormat::Json => render_json(outcome),
    }
}

/// Both formulations' lines, labelled, then the comparison verdict.
pub fn render_comparison(
    baseline: &BenchmarkOutcome,
    current: &BenchmarkOutcome,
    comparison: &Comparison,
) -> Result<String, ReportError> {
    let mut out = String::new();
    for outcome in [baseline, current] {
        let measurement = outcome.representative();
        writeln!(out, "[{}]", outcome.formulation)?;
        writeln!(out, "{}", result_line(measurement.value))?;
        writeln!(out, "{}", time_line(measurement.elapsed))?;
    }
    writeln!(out, "{comparison}")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::benchmark::compare_benchmarks;
    use crate::series::Measurement;

    fn outcome(value: f64, durations: &[u64]) -> BenchmarkOutcome {
        let durations: Vec<Duration> = durations
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect();
        BenchmarkOutcome {
            formulation: Formulation::Direct,
            iterations: 200_000_000,
            last: Measurement {
                value,
                elapsed: durations[durations.len() - 1],
            },
            stats: BenchmarkStats::from_durations(durations),
        }
    }

    fn fractional_digits(line: &str) -> usize {
        let number = line
            .split_whitespace()
            .find(|word| word.contains('.'))
            .expect("line has a decimal number");
        number.split('.').nth(1).map_or(0, str::len)
    }

    #[test]
    fn result_line_has_twelve_decimals() {
        assert_eq!(result_line(std::f64::consts::PI), "Result: 3.141592653590");
        assert_eq!(result_line(4.0), "Result: 4.000000000000");
        assert_eq!(fractional_digits(&result_line(-12_345_678.5)), 12);
        assert_eq!(fractional_digits(&result_line(1e-20)), 12);
    }

    #[test]
    fn time_line_has_six_decimals() {
        assert_eq!(
            time_line(Duration::from_millis(1234)),
            "Execution Time: 1.234000 seconds"
        );
        assert_eq!(time_line(Duration::ZERO), "Execution Time: 0.000000 seconds");
    }

    #[test]
    fn single_run_renders_exactly_two_lines() {
        let text = render_text(&outcome(3.5, &[250])).expect("render");
        assert_eq!(
            text,
            "Result: 3.500000000000\nExecution Time: 0.250000 seconds\n"
        );
    }

    #[test]
    fn multiple_runs_append_stats_block() {
        let text = render_text(&outcome(3.0, &[300, 100, 200])).expect("render");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Result: 3.000000000000"));
        assert_eq!(lines.next(), Some("Execution Time: 0.200000 seconds"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Runs:    3"));
    }

    #[test]
    fn json_report_carries_result_and_stats() {
        let json = render(&outcome(3.25, &[100, 300]), OutputFormat::Json).expect("render");
        let report: RunReport = serde_json::from_str(&json).expect("valid json");
        assert_eq!(report.formulation, Formulation::Direct);
        assert_eq!(report.iterations, 200_000_000);
        assert_eq!(report.result, 3.25);
        assert!((report.elapsed_seconds - 0.2).abs() < 1e-9);
        let stats = report.stats.expect("stats for two runs");
        assert_eq!(stats.runs, 2);
        // Nearest rank of 50% over [100ms, 300ms] rounds up to the second sample.
        assert!((stats.p50_seconds - 0.3).abs() < 1e-9);
        assert!((stats.median_seconds - 0.2).abs() < 1e-9);

        let single = render_json(&outcome(3.25, &[100])).expect("render");
        assert!(!single.contains("stats"));
        assert!(single.contains("\"formulation\": \"direct\""));
    }

    #[test]
    fn comparison_lists_both_formulations() {
        let baseline = outcome(3.0, &[100]);
        let mut current = outcome(3.0, &[100]);
        current.formulation = Formulation::Incremental;
        let comparison = compare_benchmarks(&baseline, &current);

        let text = render_comparison(&baseline, &current, &comparison).expect("render");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "[direct]");
        assert_eq!(lines[3], "[incremental]");
        assert!(lines[6].starts_with("incremental vs direct: 0.00%"));
    }
}
