#![warn(missing_docs)]
//! kernelcheck Statistical Engine
//!
//! Turns per-iteration latency samples into the numbers the harness reports:
//! - Min / lower-median / max summary (plus mean, stddev, tail percentiles)
//! - Percentile calculation preserving tail latency signals
//! - Solution-vs-reference median ratio with a faster/slower verdict

mod comparison;
mod percentiles;
mod summary;

pub use comparison::{MedianComparison, Verdict, compare_medians};
pub use percentiles::{compute_percentile, compute_percentile_sorted};
pub use summary::TimingSummary;
