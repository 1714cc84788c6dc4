//! System Metadata Collection
//!
//! Host details recorded in every report so timings can be read in context.
//! Linux-specific data (CPU model) degrades to "Unknown" on other platforms.

use super::report::RunInfo;
use chrono::Utc;
use kernelcheck_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata for one harness run
pub fn build_report_meta(challenge: &str, info: &RunInfo) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        challenge: challenge.to_string(),
        solution: info.solution.clone(),
        device: info.device.clone(),
        system: system_info(),
        config: ReportConfig {
            iterations: info.iterations,
            warmup: info.warmup,
            functional: info.functional,
            performance: info.performance,
        },
    }
}

fn system_info() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: num_cpus(),
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
