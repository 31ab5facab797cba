//! Credence Beta Calibrator
//!
//! Empirically corrects a law's nominal confidence with a Beta-Bernoulli
//! conjugate model and reports whether stated confidences match reality.
//!
//! # Overview
//!
//! - **Prior**: `initialize_law` spreads a fixed pseudo-count (12) between α
//!   and β on top of a uniform Beta(1, 1), so every prior starts with the
//!   same strength
//! - **Update**: a hit adds one to α, a miss one to β; numeric predictions
//!   hit within a tolerance, anything else must match exactly
//! - **Calibrated confidence**: posterior mean α/(α+β) with the Beta
//!   variance as uncertainty
//! - **Metrics**: Expected Calibration Error and Brier score over the
//!   retained (predicted, actual) records, bucketed by decile
//!
//! # Usage
//!
//! ```
//! use credence_calibrator::{BetaCalibrator, CalibratorConfig};
//! use serde_json::json;
//!
//! let mut calibrator = BetaCalibrator::new(CalibratorConfig::default());
//! calibrator.initialize_law("tides", 0.5);
//!
//! for day in 0..12 {
//!     calibrator.update_beta_parameters("tides", &json!("high"), &json!(if day % 4 == 0 { "low" } else { "high" }));
//! }
//!
//! let report = calibrator.get_calibration_metrics("tides");
//! assert!(report.is_calibrated());
//! println!("{}", calibrator.summary());
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [calibrator]
//! total_pseudo_count = 12.0
//! hit_tolerance = 0.1
//! min_records = 10
//! bucket_count = 10
//! well_calibrated_threshold = 0.1
//! ```

#![warn(missing_docs)]

mod calibrator;
mod config;
mod metrics;

pub use calibrator::{BetaCalibrator, BetaParams, BetaUpdate, CalibratedConfidence};
pub use config::CalibratorConfig;
pub use metrics::{
    bucket_index, compute_metrics, BucketStats, CalibrationMetrics, CalibrationRecord,
    CalibrationReport,
};
