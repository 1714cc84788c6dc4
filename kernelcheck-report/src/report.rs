//! Report Data Structures

use chrono::{DateTime, Utc};
use kernelcheck_stats::TimingSummary;
use serde::{Deserialize, Serialize};

/// Bumped whenever a field is renamed or removed
pub const SCHEMA_VERSION: u32 = 1;

/// Complete harness run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    /// Absent when the functional phase was skipped
    pub functional: Option<FunctionalSection>,
    /// Absent when the performance phase was skipped
    pub performance: Option<PerformanceSection>,
}

impl Report {
    /// True unless a functional case failed
    pub fn all_passed(&self) -> bool {
        self.functional
            .as_ref()
            .is_none_or(|f| f.passed == f.total)
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Display name of the challenge
    pub challenge: String,
    /// Solution path as given on the command line
    pub solution: String,
    /// Device the kernels ran on
    pub device: String,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Execution configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub iterations: usize,
    pub warmup: usize,
    pub functional: bool,
    pub performance: bool,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
}

/// Functional phase outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalSection {
    pub passed: usize,
    pub total: usize,
    pub cases: Vec<CaseResult>,
}

/// One functional case, numbered from 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub index: usize,
    pub status: CaseStatus,
    pub failure: Option<FailureInfo>,
}

/// Functional case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// `error`, `panic` or `mismatch`
    pub kind: String,
    pub message: String,
    /// Output parameter that disagreed with the reference
    pub parameter: Option<String>,
}

/// Performance phase outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSection {
    pub solution: TimingMetrics,
    pub reference: TimingMetrics,
    /// `solution.median_ms / reference.median_ms`
    pub ratio: f64,
    /// `faster` or `slower`
    pub verdict: String,
}

/// Latency metrics in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingMetrics {
    pub samples: usize,
    pub min_ms: f64,
    pub median_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
}

impl From<&TimingSummary> for TimingMetrics {
    fn from(stats: &TimingSummary) -> Self {
        Self {
            samples: stats.sample_count,
            min_ms: stats.min,
            median_ms: stats.median,
            max_ms: stats.max,
            mean_ms: stats.mean,
            std_dev_ms: stats.std_dev,
            p90_ms: stats.p90,
            p99_ms: stats.p99,
        }
    }
}
