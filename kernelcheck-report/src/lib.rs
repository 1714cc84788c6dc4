//! kernelcheck Report - Run Reports
//!
//! Serializable model of one harness run (functional cases, timing metrics,
//! run metadata) and its output formats:
//! - JSON (machine-readable)
//! - Human (terminal, rendered by the CLI)

mod json;
mod report;

pub use json::generate_json_report;
pub use report::{
    CaseResult, CaseStatus, FailureInfo, FunctionalSection, PerformanceSection, Report,
    ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo, TimingMetrics,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full schema
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
