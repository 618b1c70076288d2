//! Property-based tests for the series loops and report formatting.

use std::time::Duration;

use pibench::report::{result_line, time_line};
use pibench::series::{SeriesParams, evaluate_direct, evaluate_incremental};
use proptest::prelude::*;

fn digits_after_point(line: &str) -> usize {
    line.split_whitespace()
        .find_map(|word| word.split_once('.'))
        .map_or(0, |(_, frac)| frac.len())
}

proptest! {
    /// Property: the result line keeps 12 fractional digits at any magnitude
    #[test]
    fn result_line_always_has_twelve_decimals(value in -1e15f64..1e15f64) {
        let line = result_line(value);
        prop_assert!(line.starts_with("Result: "));
        prop_assert_eq!(digits_after_point(&line), 12);
    }

    /// Property: the timing line keeps 6 fractional digits
    #[test]
    fn time_line_always_has_six_decimals(nanos in 0u64..10_000_000_000_000) {
        let line = time_line(Duration::from_nanos(nanos));
        prop_assert!(line.ends_with(" seconds"));
        prop_assert_eq!(digits_after_point(&line), 6);
    }

    /// Property: one more iteration always moves the sum by less than the previous one did
    #[test]
    fn step_sizes_shrink(n in 1u64..2_000) {
        let params = SeriesParams::default();
        let a = evaluate_direct(n - 1, params);
        let b = evaluate_direct(n, params);
        let c = evaluate_direct(n + 1, params);
        prop_assert!((c - b).abs() < (b - a).abs());
    }

    /// Property: both formulations agree closely for small counts
    #[test]
    fn formulations_agree(n in 0u64..5_000) {
        let params = SeriesParams::default();
        let direct = evaluate_direct(n, params);
        let incremental = evaluate_incremental(n, params);
        prop_assert!((direct - incremental).abs() < 1e-9);
    }
}
