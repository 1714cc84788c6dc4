//! Report Building
//!
//! Folds the functional and performance outcomes into the serializable
//! [`Report`] model shared by every output format.

use super::functional::FunctionalReport;
use super::metadata::build_report_meta;
use super::performance::PerformanceComparison;
use kernelcheck_report::{
    CaseResult, CaseStatus, FailureInfo, FunctionalSection, PerformanceSection, Report,
    TimingMetrics,
};

/// Run parameters recorded alongside the results
#[derive(Debug, Clone)]
pub struct RunInfo {
    /// Solution path as given by the user
    pub solution: String,
    /// Device name
    pub device: String,
    pub iterations: usize,
    pub warmup: usize,
    /// Whether the functional phase was requested
    pub functional: bool,
    /// Whether the performance phase was requested
    pub performance: bool,
}

/// Build a complete Report from phase outcomes
///
/// # Arguments
/// * `challenge` - Challenge display name
/// * `info` - Run parameters
/// * `functional` - Functional outcome, `None` if the phase was skipped
/// * `performance` - Performance outcome, `None` if the phase was skipped
pub fn build_report(
    challenge: &str,
    info: &RunInfo,
    functional: Option<&FunctionalReport>,
    performance: Option<&PerformanceComparison>,
) -> Report {
    let functional = functional.map(|f| FunctionalSection {
        passed: f.passed(),
        total: f.total(),
        cases: f
            .cases
            .iter()
            .map(|case| CaseResult {
                index: case.index,
                status: if case.passed() {
                    CaseStatus::Passed
                } else {
                    CaseStatus::Failed
                },
                failure: case.failure.as_ref().map(|reason| FailureInfo {
                    kind: reason.kind().to_string(),
                    message: reason.to_string(),
                    parameter: reason.parameter().map(str::to_string),
                }),
            })
            .collect(),
    });

    let performance = performance.map(|p| PerformanceSection {
        solution: TimingMetrics::from(&p.solution),
        reference: TimingMetrics::from(&p.reference),
        ratio: p.ratio(),
        verdict: p.verdict().as_str().to_string(),
    });

    Report {
        meta: build_report_meta(challenge, info),
        functional,
        performance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{CaseOutcome, FailureReason};
    use kernelcheck_stats::TimingSummary;

    fn info() -> RunInfo {
        RunInfo {
            solution: "solutions/vector_add.rs".to_string(),
            device: "host".to_string(),
            iterations: 100,
            warmup: 10,
            functional: true,
            performance: true,
        }
    }

    #[test]
    fn test_build_report_sections() {
        let functional = FunctionalReport {
            cases: vec![
                CaseOutcome {
                    index: 1,
                    failure: None,
                },
                CaseOutcome {
                    index: 2,
                    failure: Some(FailureReason::Error("oops".to_string())),
                },
            ],
        };
        let performance = PerformanceComparison {
            solution: TimingSummary::from_samples(&[2.0]).unwrap(),
            reference: TimingSummary::from_samples(&[1.0]).unwrap(),
            iterations: 1,
            warmup: 10,
        };

        let report = build_report("Vector Addition", &info(), Some(&functional), Some(&performance));

        assert_eq!(report.meta.challenge, "Vector Addition");
        assert_eq!(report.meta.config.iterations, 100);
        let section = report.functional.as_ref().unwrap();
        assert_eq!((section.passed, section.total), (1, 2));
        assert_eq!(section.cases[1].status, CaseStatus::Failed);
        let failure = section.cases[1].failure.as_ref().unwrap();
        assert_eq!(failure.kind, "error");
        assert_eq!(failure.message, "exception: oops");
        let perf = report.performance.as_ref().unwrap();
        assert_eq!(perf.verdict, "slower");
        assert!((perf.ratio - 2.0).abs() < 1e-12);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_skipped_phases() {
        let report = build_report("Vector Addition", &info(), None, None);
        assert!(report.functional.is_none());
        assert!(report.performance.is_none());
        assert!(report.all_passed());
    }
}
