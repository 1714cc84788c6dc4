//! Solution vs. Reference Comparison
//!
//! The headline number is the ratio of medians:
//! `ratio = solution.median / reference.median`. A ratio above 1.0 means the
//! solution is slower than the reference.

use crate::summary::TimingSummary;
use std::fmt;

/// Relative speed of the solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Median at or below the reference median
    Faster,
    /// Median above the reference median
    Slower,
}

impl Verdict {
    /// Lowercase label used in output
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Faster => "faster",
            Verdict::Slower => "slower",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Median ratio between a solution and its reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianComparison {
    /// `solution.median / reference.median`
    pub ratio: f64,
    /// `Slower` iff `ratio > 1.0`
    pub verdict: Verdict,
}

/// Compare two timing summaries by median.
///
/// A zero reference median yields an infinite ratio when the solution took
/// any time at all, and 1.0 when both are zero.
pub fn compare_medians(solution: &TimingSummary, reference: &TimingSummary) -> MedianComparison {
    let ratio = if reference.median > 0.0 {
        solution.median / reference.median
    } else if solution.median > 0.0 {
        f64::INFINITY
    } else {
        1.0
    };

    let verdict = if ratio > 1.0 {
        Verdict::Slower
    } else {
        Verdict::Faster
    };

    MedianComparison { ratio, verdict }
}
