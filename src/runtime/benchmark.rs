//! Repeated-run harness around the series evaluator

use std::fmt;
use std::time::Duration;

use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::series::{Formulation, Measurement, SeriesEvaluator};

/// Statistical summary of the loop timings of several runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BenchmarkStats {
    /// Number of measured runs
    pub runs: usize,

    pub mean: Duration,
    pub median: Duration,
    pub std_dev: Duration,
    pub min: Duration,
    pub max: Duration,

    pub p50: Duration,
    pub p90: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

impl BenchmarkStats {
    /// Calculate statistics from a list of durations
    pub fn from_durations(mut durations: Vec<Duration>) -> Self {
        if durations.is_empty() {
            return Self::default();
        }

        durations.sort();
        let runs = durations.len();

        let total_nanos: u128 = durations.iter().map(Duration::as_nanos).sum();
        let mean_nanos = total_nanos / runs as u128;

        let median_nanos = if runs % 2 == 0 {
            (durations[runs / 2 - 1].as_nanos() + durations[runs / 2].as_nanos()) / 2
        } else {
            durations[runs / 2].as_nanos()
        };

        let variance: f64 = durations
            .iter()
            .map(|d| {
                let diff = d.as_nanos() as f64 - mean_nanos as f64;
                diff * diff
            })
            .sum::<f64>()
            / runs as f64;

        Self {
            runs,
            mean: nanos(mean_nanos),
            median: nanos(median_nanos),
            std_dev: Duration::from_secs_f64(variance.sqrt() / 1e9),
            min: durations[0],
            max: durations[runs - 1],
            p50: percentile(&durations, 50.0),
            p90: percentile(&durations, 90.0),
            p95: percentile(&durations, 95.0),
            p99: percentile(&durations, 99.0),
        }
    }
}

impl fmt::Display for BenchmarkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Runs:    {}\n\
             Mean:    {:.6} seconds\n\
             Median:  {:.6} seconds\n\
             Std Dev: {:.6} seconds\n\
             Min:     {:.6} seconds\n\
             Max:     {:.6} seconds\n\
             P50:     {:.6} seconds\n\
             P90:     {:.6} seconds\n\
             P95:     {:.6} seconds\n\
             P99:     {:.6} seconds",
            self.runs,
            self.mean.as_secs_f64(),
            self.median.as_secs_f64(),
            self.std_dev.as_secs_f64(),
            self.min.as_secs_f64(),
            self.max.as_secs_f64(),
            self.p50.as_secs_f64(),
            self.p90.as_secs_f64(),
            self.p95.as_secs_f64(),
            self.p99.as_secs_f64(),
        )
    }
}

/// Benchmark configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Evaluations run before measuring (result discarded)
    pub warmup_runs: usize,

    /// Measured evaluations
    pub runs: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_runs: 0,
            runs: 1,
        }
    }
}

/// Outcome of a benchmark: the series value and the timing summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkOutcome {
    pub formulation: Formulation,
    pub iterations: u64,
    /// Value and loop time of the last measured run.
    pub last: Measurement,
    pub stats: BenchmarkStats,
}

impl BenchmarkOutcome {
    /// The measurement to report: the run's value with the median loop time.
    pub const fn representative(&self) -> Measurement {
        Measurement {
            value: self.last.value,
            elapsed: self.stats.median,
        }
    }
}

pub struct Benchmark {
    evaluator: SeriesEvaluator,
    config: BenchmarkConfig,
}

impl Benchmark {
    pub fn new(evaluator: SeriesEvaluator) -> Self {
        Self {
            evaluator,
            config: BenchmarkConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: BenchmarkConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn warmup(mut self, runs: usize) -> Self {
        self.config.warmup_runs = runs;
        self
    }

    /// Set measured runs; zero is treated as one.
    #[must_use]
    pub const fn runs(mut self, runs: usize) -> Self {
        self.config.runs = runs;
        self
    }

    pub fn run(self) -> BenchmarkOutcome {
        for warmup in 0..self.config.warmup_runs {
            debug!(warmup, "warmup run");
            let _ = self.evaluator.measure();
        }

        let runs = self.config.runs.max(1);
        let mut durations = Vec::with_capacity(runs);
        let mut last = self.evaluator.measure();
        durations.push(last.elapsed);
        for _ in 1..runs {
            last = self.evaluator.measure();
            durations.push(last.elapsed);
        }

        BenchmarkOutcome {
            formulation: self.evaluator.formulation(),
            iterations: self.evaluator.iterations(),
            last,
            stats: BenchmarkStats::from_durations(durations),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Similar,
    Faster,
    Slower,
}

/// Relative timing of `current` against `baseline`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub baseline: Formulation,
    pub current: Formulation,
    /// Signed change of the median loop time in percent; negative is faster.
    pub diff_percent: f64,
    /// Absolute difference of the two series values.
    pub value_delta: f64,
}

impl Comparison {
    pub fn verdict(&self) -> Verdict {
        if self.diff_percent.abs() < 5.0 || !self.diff_percent.is_finite() {
            Verdict::Similar
        } else if self.diff_percent < 0.0 {
            Verdict::Faster
        } else {
            Verdict::Slower
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.verdict() {
            Verdict::Similar => "~".normal(),
            Verdict::Faster => "FASTER".green(),
            Verdict::Slower => "SLOWER".red(),
        };
        write!(
            f,
            "{} vs {}: {:.2}% {} (value delta: {:e})",
            self.current,
            self.baseline,
            self.diff_percent.abs(),
            status,
            self.value_delta
        )
    }
}

pub fn compare_benchmarks(baseline: &BenchmarkOutcome, current: &BenchmarkOutcome) -> Comparison {
    let baseline_median = baseline.stats.median.as_secs_f64();
    let current_median = current.stats.median.as_secs_f64();

    let diff_percent = if baseline_median > 0.0 {
        ((current_median - baseline_median) / baseline_median) * 100.0
    } else {
        0.0
    };

    Comparison {
        baseline: baseline.formulation,
        current: current.formulation,
        diff_percent,
        value_delta: (current.last.value - baseline.last.value).abs(),
    }
}

fn nanos(total: u128) -> Duration {
    Duration::from_nanos(u64::try_from(total).unwrap_or(u64::MAX))
}

/// Nearest-rank percentile of sorted durations
fn percentile(sorted_durations: &[Duration], p: f64) -> Duration {
    if sorted_durations.is_empty() {
        return Duration::ZERO;
    }

    let index = ((p / 100.0) * (sorted_durations.len() - 1) as f64).round() as usize;
    sorted_durations[index.min(sorted_durations.len() - 1)]
}
