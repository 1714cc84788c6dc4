//! kernelcheck Core - Kernel Contracts and Timing Runtime
//!
//! This crate provides the types shared by challenges, solutions and the
//! harness:
//! - `Tensor` / `KernelArgs`: named, in-place mutable kernel arguments
//! - `Signature`: declared parameter types and directions
//! - `Challenge` / `Solve`: the reference-oracle and solution contracts
//! - `Device`: synchronization barrier and device-native timing events
//! - `run_timed_loop`: warmup + per-iteration synchronized timing
//! - `allclose`: absolute + relative tolerance comparison
//! - link-time registry and shared-library entry points for loading

mod args;
mod bencher;
mod challenge;
mod device;
pub mod plugin;
pub mod registry;
mod signature;
mod tensor;
mod tolerance;

pub use args::{ArgError, KernelArgs, Value};
pub use bencher::{
    BenchError, DEFAULT_TIMED_ITERATIONS, DEFAULT_WARMUP_ITERATIONS, LoopPhase, TimedRun,
    run_timed_loop,
};
pub use challenge::{Challenge, KernelError, Reference, Solve};
pub use device::{Device, DeviceError, HostDevice, HostEvent};
pub use registry::{ChallengeDef, SolutionDef};
pub use signature::{Direction, Param, ParamType, Signature, SignatureError};
pub use tensor::{DType, Tensor, TensorError};
pub use tolerance::{Mismatch, Tolerance, allclose, compare_values};
