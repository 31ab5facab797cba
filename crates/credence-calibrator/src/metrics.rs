//! Calibration quality metrics
//!
//! Records are bucketed by the nominal confidence stated at prediction time.
//! Expected Calibration Error is the bucket-size-weighted gap between each
//! bucket's mean confidence and its observed hit rate; the Brier score is
//! the mean squared error between nominal confidence and outcome.

use crate::CalibratorConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One retained (predicted, actual) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// What was predicted
    pub predicted: Value,
    /// What actually happened
    pub actual: Value,
    /// Confidence stated for the prediction [0.0, 1.0]
    pub nominal_confidence: f64,
    /// Whether the prediction counted as correct
    pub hit: bool,
    /// Confidence bucket index
    pub bucket: usize,
}

/// Aggregates for one confidence bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Bucket index
    pub index: usize,
    /// Inclusive lower edge
    pub lower: f64,
    /// Exclusive upper edge (inclusive for the last bucket)
    pub upper: f64,
    /// Records in the bucket
    pub count: usize,
    /// Mean nominal confidence of the records
    pub mean_confidence: f64,
    /// Observed fraction of hits
    pub hit_rate: f64,
}

/// Calibration metrics for one law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationMetrics {
    /// Law the metrics belong to
    pub law_id: String,
    /// Records the metrics were computed from
    pub sample_size: usize,
    /// Overall fraction of hits
    pub hit_rate: f64,
    /// Expected Calibration Error [0.0, 1.0]
    pub expected_calibration_error: f64,
    /// Brier score [0.0, 1.0]
    pub brier_score: f64,
    /// ECE below the configured threshold
    pub well_calibrated: bool,
    /// Non-empty buckets in index order
    pub buckets: Vec<BucketStats>,
}

/// Outcome of a calibration metrics query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CalibrationReport {
    /// Not enough records to say anything
    InsufficientData {
        /// Records available
        records: usize,
        /// Records required
        required: usize,
        /// Human-readable explanation
        message: String,
    },

    /// Metrics computed
    Calibrated(CalibrationMetrics),
}

impl CalibrationReport {
    /// Whether metrics were computed
    pub fn is_calibrated(&self) -> bool {
        matches!(self, CalibrationReport::Calibrated(_))
    }

    /// The metrics, if computed
    pub fn metrics(&self) -> Option<&CalibrationMetrics> {
        match self {
            CalibrationReport::Calibrated(metrics) => Some(metrics),
            CalibrationReport::InsufficientData { .. } => None,
        }
    }
}

/// Bucket index of a nominal confidence
pub fn bucket_index(confidence: f64, bucket_count: usize) -> usize {
    let confidence = if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.5 };
    ((confidence * bucket_count as f64).floor() as usize).min(bucket_count.saturating_sub(1))
}

/// Compute the calibration report for a law from its retained records
pub fn compute_metrics<'a, I>(law_id: &str, records: I, config: &CalibratorConfig) -> CalibrationReport
where
    I: IntoIterator<Item = &'a CalibrationRecord>,
{
    let records: Vec<&CalibrationRecord> = records.into_iter().collect();
    let n = records.len();

    if n < config.min_records {
        return CalibrationReport::InsufficientData {
            records: n,
            required: config.min_records,
            message: "insufficient data".to_string(),
        };
    }

    let outcome = |r: &CalibrationRecord| if r.hit { 1.0 } else { 0.0 };

    // (count, confidence sum, hit sum) per bucket
    let mut sums = vec![(0usize, 0.0f64, 0.0f64); config.bucket_count];
    for record in &records {
        let slot = &mut sums[record.bucket.min(config.bucket_count - 1)];
        slot.0 += 1;
        slot.1 += record.nominal_confidence;
        slot.2 += outcome(record);
    }

    let width = 1.0 / config.bucket_count as f64;
    let buckets: Vec<BucketStats> = sums
        .iter()
        .enumerate()
        .filter(|(_, (count, _, _))| *count > 0)
        .map(|(index, &(count, conf_sum, hit_sum))| BucketStats {
            index,
            lower: index as f64 * width,
            upper: (index + 1) as f64 * width,
            count,
            mean_confidence: conf_sum / count as f64,
            hit_rate: hit_sum / count as f64,
        })
        .collect();

    let expected_calibration_error = buckets
        .iter()
        .map(|b| (b.count as f64 / n as f64) * (b.hit_rate - b.mean_confidence).abs())
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let brier_score = (records
        .iter()
        .map(|r| (r.nominal_confidence - outcome(r)).powi(2))
        .sum::<f64>()
        / n as f64)
        .clamp(0.0, 1.0);

    let hit_rate = records.iter().map(|r| outcome(r)).sum::<f64>() / n as f64;

    CalibrationReport::Calibrated(CalibrationMetrics {
        law_id: law_id.to_string(),
        sample_size: n,
        hit_rate,
        expected_calibration_error,
        brier_score,
        well_calibrated: expected_calibration_error < config.well_calibrated_threshold,
        buckets,
    })
}
