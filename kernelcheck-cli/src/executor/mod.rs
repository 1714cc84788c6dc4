//! Harness Executor
//!
//! Runs a loaded challenge against a loaded solution and turns the outcome
//! into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! LoadedChallenge + LoadedSolution
//!       │
//!       ▼
//! ┌─────────────┐
//! │ functional  │  Per-case guarded invocation, reference oracle, tolerance check
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ performance │  Warmup + synchronized timed loop for solution and reference
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with run metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`functional`] - Correctness checking with per-case failure isolation
//! - [`performance`] - Latency measurement and median comparison
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod formatting;
mod functional;
mod metadata;
mod performance;
mod report;

pub use formatting::format_human_output;
pub use functional::{
    CaseOutcome, FailureReason, FunctionalReport, invoke_guarded, run_functional_tests,
};
pub use performance::{
    PerformanceComparison, WARMUP_ITERATIONS, benchmark, run_performance_test,
};
pub use report::{RunInfo, build_report};

use kernelcheck_core::{BenchError, KernelError, SignatureError};

/// Fatal harness failure; aborts the run
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A generated case does not match the declared signature
    #[error("test case {case} does not match the solve signature: {source}")]
    Fixture {
        case: usize,
        #[source]
        source: SignatureError,
    },

    /// The reference implementation failed on a functional case
    #[error("reference implementation failed on test case {case}: {source}")]
    Reference {
        case: usize,
        #[source]
        source: KernelError,
    },

    /// The performance case does not match the declared signature
    #[error("performance case does not match the solve signature: {0}")]
    PerformanceFixture(#[source] SignatureError),

    /// Either callable failed while being benchmarked
    #[error("{target} failed during benchmarking: {source}")]
    Benchmark {
        target: &'static str,
        #[source]
        source: BenchError,
    },

    /// Benchmarking with zero timed iterations
    #[error("at least one timed iteration is required")]
    NoSamples,
}

/// Stderr progress bar in the harness style; hidden when stderr is not a terminal
pub(crate) fn progress_bar(len: usize) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(len as u64);
    pb.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
