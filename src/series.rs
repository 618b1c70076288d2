//! Alternating-series evaluation of π.
//!
//! Both loops compute `4 * (1 + Σ_{i=1..n} (1/(p1*i + p2) - 1/(p1*i - p2)))`,
//! which for `p1 = 4, p2 = 1` is the Leibniz series for π.

use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Iteration count of the shipped benchmark.
pub const ITERATIONS: u64 = 200_000_000;

/// Per-iteration denominator step of the shipped benchmark.
pub const PARAM1: i64 = 4;

/// Denominator offset of the shipped benchmark.
pub const PARAM2: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("iteration count must be positive")]
    ZeroIterations,
    #[error("denominator step must be positive, got {0}")]
    NonPositiveStep(i64),
    #[error("offset {param2} is a multiple of step {param1}; a denominator would be zero")]
    ZeroDenominator { param1: i64, param2: i64 },
    #[error("largest denominator overflows i64 after {iterations} iterations")]
    DenominatorOverflow { iterations: u64 },
}

/// Loop strategy used to derive the denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formulation {
    /// Recompute `i * param1` in floating point every iteration.
    #[default]
    Direct,
    /// Carry integer denominators forward, bumping them by `param1`.
    Incremental,
}

impl Formulation {
    pub const ALL: [Self; 2] = [Self::Direct, Self::Incremental];

    /// Runs this formulation's loop for `iterations` terms.
    pub fn evaluate(self, iterations: u64, params: SeriesParams) -> f64 {
        match self {
            Self::Direct => evaluate_direct(iterations, params),
            Self::Incremental => evaluate_incremental(iterations, params),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Incremental => "incremental",
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Formulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" | "a" => Ok(Self::Direct),
            "incremental" | "b" => Ok(Self::Incremental),
            other => Err(format!(
                "unknown formulation `{other}` (expected `direct` or `incremental`)"
            )),
        }
    }
}

/// The `param1`/`param2` pair shaping the denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesParams {
    pub param1: i64,
    pub param2: i64,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            param1: PARAM1,
            param2: PARAM2,
        }
    }
}

impl SeriesParams {
    /// Checks that no denominator of an `iterations`-term run is zero or
    /// overflows `i64`, including the final step of the incremental loop.
    pub fn validate(self, iterations: u64) -> Result<(), SeriesError> {
        if iterations == 0 {
            return Err(SeriesError::ZeroIterations);
        }
        if self.param1 <= 0 {
            return Err(SeriesError::NonPositiveStep(self.param1));
        }
        if self.param2 != 0 && self.param2 % self.param1 == 0 {
            return Err(SeriesError::ZeroDenominator {
                param1: self.param1,
                param2: self.param2,
            });
        }

        // The incremental loop steps `j1`/`j2` once more after the last term,
        // so they end at `(iterations + 1) * param1 ± param2`.
        let overflow = SeriesError::DenominatorOverflow { iterations };
        let steps = i64::try_from(iterations)
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or(overflow)?;
        steps
            .checked_mul(self.param1)
            .and_then(|top| top.checked_add(self.param2.checked_abs()?))
            .ok_or(overflow)?;
        Ok(())
    }
}

/// Formulation A: recompute `i * param1` as a float each step.
pub fn evaluate_direct(iterations: u64, params: SeriesParams) -> f64 {
    let param1 = params.param1 as f64;
    let param2 = params.param2 as f64;

    let mut result = 1.0_f64;
    for i in 1..=iterations {
        let i4 = i as f64 * param1;
        result -= 1.0 / (i4 - param2);
        result += 1.0 / (i4 + param2);
    }
    result * 4.0
}

/// Formulation B: integer denominators advanced by `param1` each step.
///
/// Callers must ensure the denominators stay within `i64`; see
/// [`SeriesParams::validate`].
pub fn evaluate_incremental(iterations: u64, params: SeriesParams) -> f64 {
    let mut j1 = params.param1 - params.param2;
    let mut j2 = params.param1 + params.param2;

    let mut result = 1.0_f64;
    for _ in 0..iterations {
        result -= 1.0 / j1 as f64;
        result += 1.0 / j2 as f64;
        j1 += params.param1;
        j2 += params.param1;
    }
    result * 4.0
}

/// A series value together with the wall-clock time of the loop that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesEvaluator {
    iterations: u64,
    params: SeriesParams,
    formulation: Formulation,
}

impl SeriesEvaluator {
    /// The fixed benchmark: 200M iterations, `param1 = 4`, `param2 = 1`.
    pub const fn standard(formulation: Formulation) -> Self {
        Self {
            iterations: ITERATIONS,
            params: SeriesParams {
                param1: PARAM1,
                param2: PARAM2,
            },
            formulation,
        }
    }

    pub fn new(
        iterations: u64,
        params: SeriesParams,
        formulation: Formulation,
    ) -> Result<Self, SeriesError> {
        params.validate(iterations)?;
        Ok(Self {
            iterations,
            params,
            formulation,
        })
    }
}

impl SeriesEvaluator {
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }

    pub const fn params(&self) -> SeriesParams {
        self.params
    }

    pub const fn formulation(&self) -> Formulation {
        self.formulation
    }

    pub fn evaluate(&self) -> f64 {
        self.formulation.evaluate(self.iterations, self.params)
    }

    /// Evaluates the series, timing only the loop.
    pub fn measure(&self) -> Measurement {
        debug!(
            formulation = %self.formulation,
            iterations = self.iterations,
            "starting series loop"
        );

        let iterations = black_box(self.iterations);
        let params = black_box(self.params);

        let start = Instant::now();
        let value = self.formulation.evaluate(iterations, params);
        let elapsed = start.elapsed();

        let value = black_box(value);
        info!(
            formulation = %self.formulation,
            elapsed_secs = elapsed.as_secs_f64(),
            "series loop finished"
        );
        Measurement { value, elapsed }
    }
}
