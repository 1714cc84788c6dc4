//! Timed Iteration Loop
//!
//! Runs one callable repeatedly on one fixed argument set under the
//! device-synchronized timing discipline:
//!
//! ```text
//! warmup × N  (untimed)
//! synchronize
//! repeat iterations:
//!     start = record_event
//!     solve(args)
//!     end   = record_event
//!     synchronize
//!     samples.push(elapsed_ms(start, end))
//! ```
//!
//! Every timed iteration synchronizes on its own, so no two iterations'
//! device work is ever in flight at the same time.

use crate::args::KernelArgs;
use crate::challenge::{KernelError, Solve};
use crate::device::{Device, DeviceError};
use std::fmt;

/// Default number of untimed warmup invocations
pub const DEFAULT_WARMUP_ITERATIONS: usize = 10;

/// Default number of timed invocations
pub const DEFAULT_TIMED_ITERATIONS: usize = 100;

/// Phase of the loop in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Untimed warmup invocation (0-based)
    Warmup(usize),
    /// Timed invocation (0-based)
    Timed(usize),
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopPhase::Warmup(i) => write!(f, "warmup iteration {}", i + 1),
            LoopPhase::Timed(i) => write!(f, "timed iteration {}", i + 1),
        }
    }
}

/// Errors from the timed loop. Both are fatal for the run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BenchError {
    #[error("kernel failed during {phase}: {source}")]
    Kernel {
        phase: LoopPhase,
        #[source]
        source: KernelError,
    },
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Raw output of the timed loop
#[derive(Debug, Clone)]
pub struct TimedRun {
    /// Per-iteration elapsed milliseconds, in iteration order
    pub samples_ms: Vec<f64>,
    /// Untimed invocations performed before measurement
    pub warmup: usize,
}

/// Run `warmup` untimed and `iterations` timed invocations of `solve`.
///
/// # Arguments
/// * `device` - Device providing the barrier and timing events
/// * `solve` - Callable under test
/// * `args` - Argument set reused (and mutated) by every invocation
/// * `iterations` - Number of timed invocations
/// * `warmup` - Number of untimed invocations before measurement
pub fn run_timed_loop<D, S>(
    device: &D,
    solve: &S,
    args: &mut KernelArgs,
    iterations: usize,
    warmup: usize,
) -> Result<TimedRun, BenchError>
where
    D: Device,
    S: Solve + ?Sized,
{
    // Warmup lets lazy compilation and caches settle before measurement
    for i in 0..warmup {
        solve.solve(args).map_err(|source| BenchError::Kernel {
            phase: LoopPhase::Warmup(i),
            source,
        })?;
    }
    device.synchronize()?;

    let mut samples_ms = Vec::with_capacity(iterations);
    for i in 0..iterations {
        let start = device.record_event()?;
        solve.solve(args).map_err(|source| BenchError::Kernel {
            phase: LoopPhase::Timed(i),
            source,
        })?;
        let end = device.record_event()?;
        device.synchronize()?;
        samples_ms.push(device.elapsed_ms(&start, &end)?);
    }

    tracing::trace!(warmup, iterations, "timed loop finished");

    Ok(TimedRun { samples_ms, warmup })
}
