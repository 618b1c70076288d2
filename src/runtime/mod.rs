pub mod benchmark;

pub use benchmark::{Benchmark, BenchmarkConfig, BenchmarkOutcome, BenchmarkStats, Comparison};
