//! Output Formatting
//!
//! Human-readable output formatting for run reports:
//! - Challenge header
//! - One PASS/FAIL line per functional case, with the failure reason
//! - Min/median/max latency for solution and reference
//! - Median ratio with a faster/slower verdict

use kernelcheck_report::{CaseStatus, Report, TimingMetrics};

/// Format a report for human-readable terminal display
///
/// # Arguments
/// * `report` - Complete run report
///
/// # Returns
/// Formatted string suitable for terminal output
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("Challenge: {}\n", report.meta.challenge));

    if let Some(functional) = &report.functional {
        output.push_str("\n=== Functional Tests ===\n");
        for case in &functional.cases {
            match (case.status, &case.failure) {
                (CaseStatus::Passed, _) => {
                    output.push_str(&format!("  Test {}: PASS\n", case.index));
                }
                (CaseStatus::Failed, Some(failure)) => {
                    output.push_str(&format!(
                        "  Test {}: FAIL ({})\n",
                        case.index, failure.message
                    ));
                }
                (CaseStatus::Failed, None) => {
                    output.push_str(&format!("  Test {}: FAIL\n", case.index));
                }
            }
        }
        output.push_str(&format!(
            "Result: {}/{} passed\n",
            functional.passed, functional.total
        ));
    }

    if let Some(performance) = &report.performance {
        output.push_str("\n=== Performance ===\n");
        output.push_str("  Solution:\n");
        push_timing(&mut output, &performance.solution);
        output.push_str("  Baseline (reference):\n");
        push_timing(&mut output, &performance.reference);
        output.push_str(&format!(
            "  Ratio: {:.2}x {}\n",
            performance.ratio, performance.verdict
        ));
    }

    output
}

fn push_timing(output: &mut String, metrics: &TimingMetrics) {
    output.push_str(&format!("    Min:    {:.3} ms\n", metrics.min_ms));
    output.push_str(&format!("    Median: {:.3} ms\n", metrics.median_ms));
    output.push_str(&format!("    Max:    {:.3} ms\n", metrics.max_ms));
}
