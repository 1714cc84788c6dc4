//! # kernelcheck
//!
//! Verification and benchmarking harness for compute kernels.
//!
//! A *challenge* defines a task: its argument signature, generators for
//! functional and performance test cases, tolerances, and a reference
//! implementation. A *solution* is a kernel entry point operating in place
//! on named arguments. kernelcheck:
//! - **Checks correctness**: runs every functional case through the solution
//!   and the reference on independent buffers, compares every output
//!   parameter under `atol + rtol * |reference|`
//! - **Isolates failures**: an error or panic in one case fails that case
//!   only; the remaining cases still run
//! - **Times fairly**: warmup, then per-iteration device events with a
//!   synchronization barrier after every iteration
//! - **Compares**: min/median/max for solution and reference, median ratio
//!
//! ## Quick Start
//!
//! ```ignore
//! use kernelcheck::prelude::*;
//!
//! struct Scale;
//!
//! impl Challenge for Scale {
//!     // name, tolerances, generators, signature, reference_impl
//! }
//!
//! fn solve(args: &mut KernelArgs) -> Result<(), KernelError> {
//!     // write outputs in place
//!     Ok(())
//! }
//!
//! register_challenge!("easy/scale", || Scale);
//! register_solution!("scale", solve);
//!
//! fn main() -> anyhow::Result<()> {
//!     kernelcheck::run()
//! }
//! ```
//!
//! ## Shared Libraries
//!
//! A `cdylib` crate can export a challenge or solution instead:
//!
//! ```ignore
//! kernelcheck::export_challenge!(|| Scale);
//! kernelcheck::export_solution!(solve);
//! ```
//!
//! The harness then loads `<challenge dir>/libchallenge.so` and the solution
//! library given on the command line.

// Re-export core types
pub use kernelcheck_core::{
    ArgError, BenchError, Challenge, ChallengeDef, DType, DEFAULT_TIMED_ITERATIONS,
    DEFAULT_WARMUP_ITERATIONS, Device, DeviceError, Direction, HostDevice, HostEvent, KernelArgs,
    KernelError, Mismatch, Param, ParamType, Reference, Signature, SignatureError, Solve,
    SolutionDef, Tensor, TensorError, Tolerance, TimedRun, Value, allclose, compare_values,
    plugin, registry, run_timed_loop,
};

// Re-export stats
pub use kernelcheck_stats::{MedianComparison, TimingSummary, Verdict, compare_medians};

// Re-export report types
pub use kernelcheck_report::{OutputFormat, Report, generate_json_report};

// Re-export the harness
pub use kernelcheck_cli::{
    Cli, DylibLoader, FunctionalReport, HarnessError, HarnessLoader, LoadError, LoadedChallenge,
    LoadedSolution, ModuleLoader, ModuleOrigin, PerformanceComparison, RunPlan, benchmark, format_human_output, invoke_guarded,
    run_functional_tests, run_harness, run_performance_test, run_with_cli,
};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Challenge, DType, Direction, KernelArgs, KernelError, ParamType, Signature, Solve, Tensor,
        export_challenge, export_solution, register_challenge, register_solution,
    };
}

/// Register a challenge constructor under a key relative to the challenges
/// root, e.g. `register_challenge!("easy/vector_add", VectorAdd::new)`.
#[macro_export]
macro_rules! register_challenge {
    ($key:expr, $ctor:expr $(,)?) => {
        $crate::internal::inventory::submit! {
            $crate::ChallengeDef {
                key: $key,
                constructor: || ::std::boxed::Box::new(($ctor)()),
                file: file!(),
                line: line!(),
            }
        }
    };
}

/// Register a solve function under the solution's file stem,
/// e.g. `register_solution!("vector_add", solve)`.
#[macro_export]
macro_rules! register_solution {
    ($key:expr, $solve:expr $(,)?) => {
        $crate::internal::inventory::submit! {
            $crate::SolutionDef {
                key: $key,
                constructor: || ::std::boxed::Box::new($solve),
                file: file!(),
                line: line!(),
            }
        }
    };
}

/// Export the shared-library entry points for a challenge.
///
/// Use once per `cdylib`; the library must be built against the same
/// `kernelcheck` version and compiler as the harness.
#[macro_export]
macro_rules! export_challenge {
    ($ctor:expr $(,)?) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn kernelcheck_challenge() -> *mut ::std::boxed::Box<dyn $crate::Challenge> {
            $crate::plugin::into_challenge_ptr(::std::boxed::Box::new(($ctor)()))
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn kernelcheck_challenge_abi() -> u32 {
            $crate::plugin::ABI_VERSION
        }
    };
}

/// Export the shared-library entry points for a solve function.
#[macro_export]
macro_rules! export_solution {
    ($solve:expr $(,)?) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn kernelcheck_solution() -> *mut ::std::boxed::Box<dyn $crate::Solve> {
            $crate::plugin::into_solution_ptr(::std::boxed::Box::new($solve))
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn kernelcheck_solution_abi() -> u32 {
            $crate::plugin::ABI_VERSION
        }
    };
}

/// Run the kernelcheck CLI harness.
///
/// Call this from your harness binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     kernelcheck::run()
/// }
/// ```
pub use kernelcheck_cli::run;
