//! Configuration for Beta calibration

use serde::{Deserialize, Serialize};

/// Configuration for the Beta calibrator
///
/// # Examples
///
/// ```
/// use credence_calibrator::CalibratorConfig;
///
/// let config = CalibratorConfig::default();
/// assert_eq!(config.total_pseudo_count, 12.0);
/// assert_eq!(config.min_records, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorConfig {
    /// Prior strength α+β given to every initialised law
    /// Default: 12, so different priors start with equal strength
    pub total_pseudo_count: f64,

    /// Uniform pseudo-count each side always receives
    /// Default: 1, i.e. a Beta(1, 1) base that uninitialised laws start from
    pub base_pseudo_count: f64,

    /// Numeric predictions within this distance of the actual value are hits
    pub hit_tolerance: f64,

    /// Records required before calibration metrics are reported
    pub min_records: usize,

    /// Number of equal-width confidence buckets
    pub bucket_count: usize,

    /// Expected calibration error below which a law counts as well calibrated
    pub well_calibrated_threshold: f64,

    /// Calibration records retained per law (oldest evicted first)
    pub record_capacity: usize,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            total_pseudo_count: 12.0,
            base_pseudo_count: 1.0,
            hit_tolerance: 0.1,
            min_records: 10,
            bucket_count: 10,
            well_calibrated_threshold: 0.1,
            record_capacity: 1000,
        }
    }
}

impl CalibratorConfig {
    /// Tighter hit tolerance and calibration threshold
    pub fn strict() -> Self {
        Self {
            hit_tolerance: 0.05,
            min_records: 30,
            well_calibrated_threshold: 0.05,
            ..Self::default()
        }
    }

    /// Looser hit tolerance and calibration threshold
    pub fn lenient() -> Self {
        Self {
            hit_tolerance: 0.2,
            min_records: 5,
            well_calibrated_threshold: 0.15,
            ..Self::default()
        }
    }

    /// Repair values that would break the model
    ///
    /// Non-positive or non-finite values revert to their defaults; the total
    /// pseudo-count is raised to at least twice the base.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.base_pseudo_count.is_finite() && self.base_pseudo_count > 0.0) {
            self.base_pseudo_count = defaults.base_pseudo_count;
        }
        if !self.total_pseudo_count.is_finite() {
            self.total_pseudo_count = defaults.total_pseudo_count;
        }
        self.total_pseudo_count = self.total_pseudo_count.max(2.0 * self.base_pseudo_count);

        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            self.hit_tolerance = defaults.hit_tolerance;
        }
        if !(self.well_calibrated_threshold.is_finite() && self.well_calibrated_threshold > 0.0) {
            self.well_calibrated_threshold = defaults.well_calibrated_threshold;
        }
        if self.bucket_count == 0 {
            self.bucket_count = defaults.bucket_count;
        }
        if self.record_capacity == 0 {
            self.record_capacity = defaults.record_capacity;
        }
        self.min_records = self.min_records.max(1);

        self
    }
}
