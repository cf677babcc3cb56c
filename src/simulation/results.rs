//! Aggregation of drop statistics across a run.
//!
//! Contains helpers for:
//! - Collecting every drop's `DropStatistics`
//! - Flattened per-metric views over all drops
//! - Empirical CDF points of a metric
//! - Percentile summaries (min, 5th percentile, median, mean, max)

use serde::Serialize;

use super::types::DropStatistics;

/// Statistics of every drop run so far, in drop order.
#[derive(Debug, Clone, Default)]
pub struct Results {
    drops: Vec<DropStatistics>,
}

impl Results {
    pub fn new() -> Self {
        Results::default()
    }

    pub fn add_statistics(&mut self, statistics: DropStatistics) {
        self.drops.push(statistics);
    }

    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[DropStatistics] {
        &self.drops
    }

    /// Downlink SNIR samples (dB) of all drops.
    pub fn downlink_snir(&self) -> Vec<f64> {
        self.drops.iter().flat_map(|d| d.downlink.snir_db.iter().copied()).collect()
    }

    /// Downlink throughput samples (Mbit/s) of all drops.
    pub fn downlink_throughput(&self) -> Vec<f64> {
        self.drops.iter().flat_map(|d| d.downlink.throughput.iter().copied()).collect()
    }

    /// Uplink SNIR samples (dB) of all drops.
    pub fn uplink_snir(&self) -> Vec<f64> {
        self.drops.iter().flat_map(|d| d.uplink.snir_db.iter().copied()).collect()
    }

    /// Uplink throughput samples (Mbit/s) of all drops.
    pub fn uplink_throughput(&self) -> Vec<f64> {
        self.drops.iter().flat_map(|d| d.uplink.throughput.iter().copied()).collect()
    }

    /// Percentile summary of every metric. Metrics without samples are `None`.
    pub fn summary(&self) -> ResultsSummary {
        ResultsSummary {
            drops: self.drop_count(),
            downlink_snir: MetricSummary::from_values(&self.downlink_snir()),
            downlink_throughput: MetricSummary::from_values(&self.downlink_throughput()),
            uplink_snir: MetricSummary::from_values(&self.uplink_snir()),
            uplink_throughput: MetricSummary::from_values(&self.uplink_throughput()),
        }
    }

    pub fn reset(&mut self) {
        self.drops.clear();
    }
}

/// Empirical CDF of a set of samples.
///
/// Returns `(value, p)` pairs in ascending value order where the `k`-th
/// (0-based) value has `p = k / n`, so the curve starts at 0 and ends at
/// `(n - 1) / n`. Non-finite samples are ignored.
pub fn cdf(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_finite(values);
    let n = sorted.len() as f64;
    sorted.into_iter().enumerate().map(|(k, value)| (value, k as f64 / n)).collect()
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Nearest-rank percentile of an ascending, non-empty slice; `fraction` in [0, 1].
///
/// ```text
/// index = max(ceil(n · fraction), 1) - 1
/// ```
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let rank = (sorted.len() as f64 * fraction).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Distribution summary of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub p5: f64,
    pub median: f64,
    pub mean: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() {
            return None;
        }
        let n = sorted.len();
        let median = if n % 2 == 0 { (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0 } else { sorted[n / 2] };

        Some(MetricSummary {
            count: n,
            min: sorted[0],
            p5: percentile(&sorted, 0.05),
            median,
            mean: sorted.iter().sum::<f64>() / n as f64,
            max: sorted[n - 1],
        })
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub drops: usize,
    pub downlink_snir: Option<MetricSummary>,
    pub downlink_throughput: Option<MetricSummary>,
    pub uplink_snir: Option<MetricSummary>,
    pub uplink_throughput: Option<MetricSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::LinkStatistics;

    fn drop_statistics(downlink: &[f64], uplink: &[f64]) -> DropStatistics {
        let mut statistics = DropStatistics::default();
        for &snir in downlink {
            statistics.downlink.push(snir, snir * 2.0);
        }
        for &snir in uplink {
            statistics.uplink.push(snir, snir * 3.0);
        }
        statistics
    }

    #[test]
    fn drops_are_flattened_in_order() {
        let mut results = Results::new();
        results.add_statistics(drop_statistics(&[1.0, 2.0], &[5.0]));
        results.add_statistics(drop_statistics(&[3.0], &[]));

        assert_eq!(results.drop_count(), 2);
        assert_eq!(results.downlink_snir(), vec![1.0, 2.0, 3.0]);
        assert_eq!(results.downlink_throughput(), vec![2.0, 4.0, 6.0]);
        assert_eq!(results.uplink_snir(), vec![5.0]);
        assert_eq!(results.uplink_throughput(), vec![15.0]);
    }

    #[test]
    fn cdf_is_sorted_and_starts_at_zero() {
        let points = cdf(&[3.0, -1.0, 2.0, 0.5]);
        assert_eq!(points, vec![(-1.0, 0.0), (0.5, 0.25), (2.0, 0.5), (3.0, 0.75)]);
        assert!(cdf(&[]).is_empty());
        assert_eq!(cdf(&[f64::NAN, 1.0, f64::INFINITY, 2.0]), vec![(1.0, 0.0), (2.0, 0.5)]);
    }

    #[test]
    fn summary_of_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let summary = MetricSummary::from_values(&values).unwrap();
        assert_eq!(summary.count, 100);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 100.0);
        assert!((summary.mean - 50.5).abs() < 1e-12);
        assert!((summary.median - 50.5).abs() < 1e-12);
        assert_eq!(summary.p5, 5.0);
    }

    #[test]
    fn odd_sample_median_is_the_middle_value() {
        let summary = MetricSummary::from_values(&[9.0, 1.0, 4.0]).unwrap();
        assert_eq!(summary.median, 4.0);
        assert_eq!(summary.p5, 1.0);
    }

    #[test]
    fn infinite_samples_do_not_reach_the_summary() {
        let summary = MetricSummary::from_values(&[f64::NEG_INFINITY, 2.0, 4.0, f64::INFINITY]).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_metrics_have_no_summary() {
        let mut results = Results::new();
        results.add_statistics(DropStatistics {
            downlink: LinkStatistics::default(),
            uplink: LinkStatistics::default(),
        });
        let summary = results.summary();
        assert_eq!(summary.drops, 1);
        assert_eq!(summary.downlink_snir, None);
        assert_eq!(summary.uplink_throughput, None);
    }

    #[test]
    fn reset_discards_all_drops() {
        let mut results = Results::new();
        results.add_statistics(drop_statistics(&[1.0], &[1.0]));
        results.reset();
        assert_eq!(results.drop_count(), 0);
        assert!(results.downlink_snir().is_empty());
    }

    #[test]
    fn summary_serializes_to_json() {
        let mut results = Results::new();
        results.add_statistics(drop_statistics(&[1.0, 3.0], &[2.0]));
        let json = serde_json::to_value(results.summary()).unwrap();
        assert_eq!(json["drops"], 1);
        assert_eq!(json["downlink_snir"]["median"], 2.0);
        assert_eq!(json["uplink_snir"]["count"], 1);
    }
}
