//! Timing Summary
//!
//! Summarizes per-iteration latencies (milliseconds) for one callable:
//! - Min, median, max taken from the sorted samples
//! - Median uses the lower-median convention: `sorted[len / 2]`, no averaging
//!   of the two middle values for even counts
//! - Mean, standard deviation and tail percentiles are extras for reports

use crate::percentiles::compute_percentile_sorted;

/// Summary of one sample set
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    /// Fastest iteration
    pub min: f64,
    /// Lower median
    pub median: f64,
    /// Slowest iteration
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (0 for fewer than two samples)
    pub std_dev: f64,
    /// 90th percentile (linear interpolation)
    pub p90: f64,
    /// 99th percentile (linear interpolation)
    pub p99: f64,
    /// Number of samples summarized
    pub sample_count: usize,
}

impl TimingSummary {
    /// Summarize `samples`; `None` when there are none.
    ///
    /// Samples are sorted ascending with NaN ordered last.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = if n < 2 {
            0.0
        } else {
            let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        };

        Some(Self {
            min: sorted[0],
            median: sorted[n / 2],
            max: sorted[n - 1],
            mean,
            std_dev,
            p90: compute_percentile_sorted(&sorted, 90.0),
            p99: compute_percentile_sorted(&sorted, 99.0),
            sample_count: n,
        })
    }
}
