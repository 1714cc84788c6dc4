//! Challenge and Solution Contracts
//!
//! A [`Challenge`] owns the correctness oracle (`reference_impl`), the test
//! data generators and the `solve` signature. A [`Solve`] is the user's kernel
//! entry point. Both take the same named-argument set and mutate their output
//! tensors in place.

use crate::args::{ArgError, KernelArgs};
use crate::device::DeviceError;
use crate::signature::Signature;
use crate::tensor::TensorError;

/// Error returned by a kernel invocation (solution or reference)
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Args(#[from] ArgError),
    #[error(transparent)]
    Tensor(#[from] TensorError),
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl KernelError {
    /// Free-form failure message
    pub fn msg(message: impl Into<String>) -> Self {
        KernelError::Message(message.into())
    }
}

/// A computational task with a reference implementation and test generators
pub trait Challenge {
    /// Human-readable identifier, used for reporting only
    fn name(&self) -> &str;

    /// Absolute tolerance for output comparison
    fn atol(&self) -> f64;

    /// Relative tolerance for output comparison
    fn rtol(&self) -> f64;

    /// Functional test cases, in report order
    fn generate_functional_test(&self) -> Vec<KernelArgs>;

    /// A single (usually large) case used for latency measurement.
    ///
    /// Called once per benchmarked implementation; every call must return
    /// freshly allocated buffers.
    fn generate_performance_test(&self) -> KernelArgs;

    /// Declared parameters of `solve`
    fn solve_signature(&self) -> Signature;

    /// Correct implementation; mutates `out`/`inout` arguments in place
    fn reference_impl(&self, args: &mut KernelArgs) -> Result<(), KernelError>;
}

/// A user-supplied kernel entry point
pub trait Solve {
    fn solve(&self, args: &mut KernelArgs) -> Result<(), KernelError>;
}

impl<F> Solve for F
where
    F: Fn(&mut KernelArgs) -> Result<(), KernelError>,
{
    fn solve(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        self(args)
    }
}

/// Adapter exposing a challenge's `reference_impl` as a [`Solve`]
pub struct Reference<'a, C: ?Sized>(pub &'a C);

impl<C: Challenge + ?Sized> Solve for Reference<'_, C> {
    fn solve(&self, args: &mut KernelArgs) -> Result<(), KernelError> {
        self.0.reference_impl(args)
    }
}
