//! Tolerance Comparison
//!
//! Elementwise closeness check between a solution's output and the
//! reference output:
//!
//! ```text
//! |actual - expected| <= atol + rtol * |expected|
//! ```
//!
//! NaN is never close to anything (including NaN). Infinities are close
//! only to an infinity of the same sign.

use crate::args::Value;
use crate::tensor::{DType, Tensor};
use std::fmt;

/// Absolute and relative tolerance pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerance {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self { atol, rtol }
    }

    /// Whether a single pair of elements is within tolerance
    #[inline]
    pub fn is_close(&self, actual: f64, expected: f64) -> bool {
        if actual == expected {
            return true;
        }
        if !actual.is_finite() || !expected.is_finite() {
            return false;
        }
        (actual - expected).abs() <= self.atol + self.rtol * expected.abs()
    }
}

/// Why two values were not considered close
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// Different value kinds (e.g. tensor vs int)
    Kind {
        expected: &'static str,
        actual: &'static str,
    },
    /// Tensors with different element types
    DType { expected: DType, actual: DType },
    /// Tensors with different shapes
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    /// Same layout, but some elements fall outside the tolerance
    Values {
        /// Elements outside tolerance
        mismatched: usize,
        /// Elements compared
        total: usize,
        /// Largest absolute difference among mismatched elements
        max_abs_diff: f64,
        /// Index of the element with the largest difference
        worst_index: Vec<usize>,
        actual: f64,
        expected: f64,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Kind { expected, actual } => {
                write!(f, "expected a {expected}, found a {actual}")
            }
            Mismatch::DType { expected, actual } => {
                write!(f, "dtype {actual} does not match reference dtype {expected}")
            }
            Mismatch::Shape { expected, actual } => {
                write!(f, "shape {actual:?} does not match reference shape {expected:?}")
            }
            Mismatch::Values {
                mismatched,
                total,
                max_abs_diff,
                worst_index,
                actual,
                expected,
            } => write!(
                f,
                "{mismatched} of {total} elements out of tolerance, max abs diff {max_abs_diff:.3e} at {worst_index:?} (got {actual}, expected {expected})"
            ),
        }
    }
}

/// Compare two tensors elementwise.
///
/// Every element is checked so the mismatch carries full diagnostics; the
/// pass/fail outcome is the same as stopping at the first bad element.
pub fn allclose(actual: &Tensor, expected: &Tensor, tol: Tolerance) -> Result<(), Mismatch> {
    if actual.dtype() != expected.dtype() {
        return Err(Mismatch::DType {
            expected: expected.dtype(),
            actual: actual.dtype(),
        });
    }
    if actual.shape() != expected.shape() {
        return Err(Mismatch::Shape {
            expected: expected.shape().to_vec(),
            actual: actual.shape().to_vec(),
        });
    }

    let mut mismatched = 0usize;
    let mut worst: Option<(usize, f64, f64, f64)> = None;

    for i in 0..expected.numel() {
        let (Some(a), Some(e)) = (actual.get_f64(i), expected.get_f64(i)) else {
            break;
        };
        if tol.is_close(a, e) {
            continue;
        }
        mismatched += 1;
        let diff = (a - e).abs();
        // NaN differences rank above every finite difference
        let worse = match worst {
            None => true,
            Some((_, d, _, _)) => diff > d || (diff.is_nan() && !d.is_nan()),
        };
        if worse {
            worst = Some((i, diff, a, e));
        }
    }

    match worst {
        None => Ok(()),
        Some((index, max_abs_diff, actual_value, expected_value)) => Err(Mismatch::Values {
            mismatched,
            total: expected.numel(),
            max_abs_diff,
            worst_index: expected.unravel_index(index),
            actual: actual_value,
            expected: expected_value,
        }),
    }
}

/// Compare two argument values under `tol`.
///
/// Tensors use [`allclose`]; numeric scalars use the same element rule;
/// booleans must be equal.
pub fn compare_values(actual: &Value, expected: &Value, tol: Tolerance) -> Result<(), Mismatch> {
    let scalar = |a: f64, e: f64| {
        if tol.is_close(a, e) {
            Ok(())
        } else {
            Err(Mismatch::Values {
                mismatched: 1,
                total: 1,
                max_abs_diff: (a - e).abs(),
                worst_index: Vec::new(),
                actual: a,
                expected: e,
            })
        }
    };

    match (actual, expected) {
        (Value::Tensor(a), Value::Tensor(e)) => allclose(a, e, tol),
        (Value::Float(a), Value::Float(e)) => scalar(*a, *e),
        (Value::Int(a), Value::Int(e)) => scalar(*a as f64, *e as f64),
        (Value::Bool(a), Value::Bool(e)) => {
            scalar(if *a { 1.0 } else { 0.0 }, if *e { 1.0 } else { 0.0 })
        }
        (a, e) => Err(Mismatch::Kind {
            expected: e.kind(),
            actual: a.kind(),
        }),
    }
}
