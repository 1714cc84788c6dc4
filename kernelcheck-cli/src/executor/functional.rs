//! Functional Test Execution
//!
//! Checks a solution against the challenge's reference oracle, one generated
//! case at a time:
//!
//! ```text
//! case args ──► signature check (fatal on mismatch)
//!     │
//!     ├──► reference copy (deep-copied tensors)
//!     │
//!     ├──► invoke_guarded(solution, case)      Err/panic ─► FAIL, next case
//!     │
//!     ├──► reference_impl(reference copy)      Err ─► fatal
//!     │
//!     └──► compare every out/inout parameter   first mismatch ─► FAIL
//! ```
//!
//! A failing case never stops the remaining cases.

use super::{HarnessError, progress_bar};
use kernelcheck_core::{
    Challenge, Device, KernelArgs, KernelError, Mismatch, Signature, Solve, Tolerance,
    compare_values,
};
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::debug;

/// Why a functional case failed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The solution (or the barrier after it) returned an error
    Error(String),
    /// The solution panicked
    Panic(String),
    /// An output parameter disagreed with the reference
    Mismatch { parameter: String, detail: Mismatch },
}

impl FailureReason {
    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Error(_) => "error",
            FailureReason::Panic(_) => "panic",
            FailureReason::Mismatch { .. } => "mismatch",
        }
    }

    /// Parameter that failed the comparison, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            FailureReason::Mismatch { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Error(message) => write!(f, "exception: {}", message),
            FailureReason::Panic(message) => write!(f, "exception: panicked: {}", message),
            FailureReason::Mismatch { parameter, detail } => {
                write!(f, "mismatch on '{}': {}", parameter, detail)
            }
        }
    }
}

/// Outcome of one functional case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    /// 1-based case number, in generation order
    pub index: usize,
    /// `None` when the case passed
    pub failure: Option<FailureReason>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// All functional cases of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionalReport {
    pub cases: Vec<CaseOutcome>,
}

impl FunctionalReport {
    /// Number of passing cases
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    /// Number of generated cases
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }
}

/// Invoke `solve` on `args` and wait for the device.
///
/// The single failure boundary for solution code: an `Err` or a panic from
/// the solution, or a failed barrier, becomes a [`FailureReason`].
pub fn invoke_guarded<D, S>(device: &D, solve: &S, args: &mut KernelArgs) -> Result<(), FailureReason>
where
    D: Device + ?Sized,
    S: Solve + ?Sized,
{
    let result = catch_unwind(AssertUnwindSafe(|| -> Result<(), KernelError> {
        solve.solve(args)?;
        device.synchronize()?;
        Ok(())
    }));

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(FailureReason::Error(e.to_string())),
        Err(panic) => Err(FailureReason::Panic(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run every functional case of `challenge` against `solve`.
///
/// Fatal errors: a case that does not match the signature, or a failing
/// reference implementation. Solution failures are recorded per case.
pub fn run_functional_tests<D, C, S>(
    device: &D,
    challenge: &C,
    solve: &S,
) -> Result<FunctionalReport, HarnessError>
where
    D: Device + ?Sized,
    C: Challenge + ?Sized,
    S: Solve + ?Sized,
{
    let cases = challenge.generate_functional_test();
    let signature = challenge.solve_signature();
    let tol = Tolerance::new(challenge.atol(), challenge.rtol());
    debug!(cases = cases.len(), atol = tol.atol, rtol = tol.rtol, "functional phase");

    let pb = progress_bar(cases.len());
    let mut report = FunctionalReport {
        cases: Vec::with_capacity(cases.len()),
    };

    for (i, mut args) in cases.into_iter().enumerate() {
        let index = i + 1;
        pb.set_message(format!("test {}", index));

        signature
            .check(&args)
            .map_err(|source| HarnessError::Fixture { case: index, source })?;

        let mut expected = args.reference_copy();

        let failure = match invoke_guarded(device, solve, &mut args) {
            Err(reason) => Some(reason),
            Ok(()) => {
                challenge
                    .reference_impl(&mut expected)
                    .map_err(|source| HarnessError::Reference { case: index, source })?;
                compare_outputs(&signature, &args, &expected, tol).err()
            }
        };

        match &failure {
            None => debug!(case = index, "pass"),
            Some(reason) => debug!(case = index, "fail: {}", reason),
        }
        report.cases.push(CaseOutcome { index, failure });
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(report)
}

/// Compare out/inout parameters in signature order; the first mismatch wins
fn compare_outputs(
    signature: &Signature,
    actual: &KernelArgs,
    expected: &KernelArgs,
    tol: Tolerance,
) -> Result<(), FailureReason> {
    for (name, _) in signature.outputs() {
        let (Some(a), Some(e)) = (actual.get(name), expected.get(name)) else {
            return Err(FailureReason::Error(format!(
                "output '{}' disappeared from the arguments",
                name
            )));
        };
        compare_values(a, e, tol).map_err(|detail| FailureReason::Mismatch {
            parameter: name.to_string(),
            detail,
        })?;
    }
    Ok(())
}
