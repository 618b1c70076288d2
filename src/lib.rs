//! Leibniz-series π micro-benchmark.
//!
//! [`series`] holds the two loop formulations, [`runtime::benchmark`] the
//! repeated-run harness and [`report`] the stdout rendering.

pub mod cli;
pub mod report;
pub mod runtime;
pub mod series;
pub mod utils;
pub mod version;
