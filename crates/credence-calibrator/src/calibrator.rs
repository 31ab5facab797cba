//! Core Beta-Bernoulli calibrator

use crate::metrics::{bucket_index, compute_metrics, CalibrationRecord, CalibrationReport};
use crate::CalibratorConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

/// Beta(α, β) posterior over "the law's prediction is correct"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Law identifier
    pub law_id: String,
    /// Pseudo-count of hits (> 0)
    pub alpha: f64,
    /// Pseudo-count of misses (> 0)
    pub beta: f64,
}

impl BetaParams {
    /// Posterior mean α / (α + β)
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Posterior variance αβ / ((α+β)²(α+β+1))
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        (self.alpha * self.beta) / (sum * sum * (sum + 1.0))
    }

    /// Conjugate update: α += 1 on a hit, β += 1 on a miss
    pub fn observe(&mut self, hit: bool) {
        if hit {
            self.alpha += 1.0;
        } else {
            self.beta += 1.0;
        }
    }
}

/// Trust-corrected probability for a law
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedConfidence {
    /// Posterior mean
    pub confidence: f64,
    /// Posterior variance
    pub uncertainty: f64,
    /// False when the law has never been initialised or updated
    pub known: bool,
}

/// Result of one Beta update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaUpdate {
    /// Posterior mean after the update
    pub confidence: f64,
    /// Whether the prediction counted as a hit
    pub hit: bool,
}

#[derive(Debug, Clone)]
struct LawState {
    params: BetaParams,
    records: VecDeque<CalibrationRecord>,
}

/// Per-law Beta-Bernoulli calibration
///
/// Laws are fully independent: an update to one never touches another.
///
/// # Examples
///
/// ```
/// use credence_calibrator::{BetaCalibrator, CalibratorConfig};
/// use serde_json::json;
///
/// let mut calibrator = BetaCalibrator::new(CalibratorConfig::default());
/// calibrator.initialize_law("orbit", 0.8);
///
/// let update = calibrator.update_beta_parameters("orbit", &json!(3.0), &json!(3.05));
/// assert!(update.hit);
///
/// let calibrated = calibrator.get_calibrated_confidence("orbit");
/// assert!((calibrated.confidence - 10.0 / 13.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct BetaCalibrator {
    config: CalibratorConfig,
    laws: BTreeMap<String, LawState>,
}

impl BetaCalibrator {
    /// Create a calibrator with the given configuration
    pub fn new(config: CalibratorConfig) -> Self {
        Self {
            config: config.sanitized(),
            laws: BTreeMap::new(),
        }
    }

    /// Create a calibrator with default configuration
    pub fn default_config() -> Self {
        Self::new(CalibratorConfig::default())
    }

    /// Current configuration
    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Uniform prior that uninitialised laws start from
    fn uniform_params(&self, law_id: &str) -> BetaParams {
        BetaParams {
            law_id: law_id.to_string(),
            alpha: self.config.base_pseudo_count,
            beta: self.config.base_pseudo_count,
        }
    }

    /// (Re)initialise a law from a prior confidence
    ///
    /// Each side gets the base pseudo-count plus its share of the remaining
    /// strength, so α + β always equals the configured total. With defaults,
    /// priors 0.5, 0.8 and 0.2 give Beta(6, 6), Beta(9, 3) and Beta(3, 9).
    /// Existing calibration records for the law are discarded.
    pub fn initialize_law(&mut self, law_id: &str, prior_confidence: f64) -> BetaParams {
        let prior = if prior_confidence.is_finite() {
            prior_confidence.clamp(0.0, 1.0)
        } else {
            tracing::warn!(law_id, prior_confidence, "non-finite prior, using 0.5");
            0.5
        };

        let base = self.config.base_pseudo_count;
        let spread = self.config.total_pseudo_count - 2.0 * base;
        let params = BetaParams {
            law_id: law_id.to_string(),
            alpha: base + prior * spread,
            beta: base + (1.0 - prior) * spread,
        };

        tracing::info!(law_id, alpha = params.alpha, beta = params.beta, "initialized law");
        self.laws.insert(
            law_id.to_string(),
            LawState {
                params: params.clone(),
                records: VecDeque::new(),
            },
        );
        params
    }

    /// Score a prediction and fold it into the law's posterior
    ///
    /// The law's current posterior mean is recorded as the nominal
    /// confidence of the prediction. Updating an unknown law starts it from
    /// the uniform Beta(1, 1) prior.
    pub fn update_beta_parameters(&mut self, law_id: &str, predicted: &Value, actual: &Value) -> BetaUpdate {
        let nominal = self
            .laws
            .get(law_id)
            .map(|state| state.params.mean())
            .unwrap_or(0.5);
        self.record_outcome(law_id, nominal, predicted, actual)
    }

    /// Like [`update_beta_parameters`](Self::update_beta_parameters), with a
    /// caller-stated confidence recorded as nominal
    ///
    /// Used to calibrate a confidence that comes from elsewhere, for example
    /// the evidence-derived confidence of a hypothesis.
    pub fn update_with_stated_confidence(
        &mut self,
        law_id: &str,
        stated_confidence: f64,
        predicted: &Value,
        actual: &Value,
    ) -> BetaUpdate {
        let nominal = if stated_confidence.is_finite() {
            stated_confidence.clamp(0.0, 1.0)
        } else {
            tracing::warn!(law_id, stated_confidence, "non-finite stated confidence, using 0.5");
            0.5
        };
        self.record_outcome(law_id, nominal, predicted, actual)
    }

    fn record_outcome(&mut self, law_id: &str, nominal: f64, predicted: &Value, actual: &Value) -> BetaUpdate {
        let hit = self.is_hit(predicted, actual);
        let bucket = bucket_index(nominal, self.config.bucket_count);
        let capacity = self.config.record_capacity;

        let uniform = self.uniform_params(law_id);
        let state = self.laws.entry(law_id.to_string()).or_insert_with(|| {
            tracing::warn!(law_id, "update for uninitialized law, starting from uniform prior");
            LawState {
                params: uniform,
                records: VecDeque::new(),
            }
        });

        state.params.observe(hit);
        if state.records.len() == capacity {
            state.records.pop_front();
        }
        state.records.push_back(CalibrationRecord {
            predicted: predicted.clone(),
            actual: actual.clone(),
            nominal_confidence: nominal,
            hit,
            bucket,
        });

        let confidence = state.params.mean();
        tracing::debug!(
            law_id,
            hit,
            alpha = state.params.alpha,
            beta = state.params.beta,
            confidence,
            "updated beta parameters"
        );

        BetaUpdate { confidence, hit }
    }

    /// Numeric pairs hit within tolerance; anything else must match exactly
    pub fn is_hit(&self, predicted: &Value, actual: &Value) -> bool {
        match (predicted.as_f64(), actual.as_f64()) {
            (Some(p), Some(a)) => (p - a).abs() < self.config.hit_tolerance,
            _ => predicted == actual,
        }
    }

    /// Posterior mean and variance for a law
    ///
    /// Unknown laws report the uniform prior: confidence 0.5 with the
    /// largest variance any law can have (1/12 with default settings).
    pub fn get_calibrated_confidence(&self, law_id: &str) -> CalibratedConfidence {
        match self.laws.get(law_id) {
            Some(state) => CalibratedConfidence {
                confidence: state.params.mean(),
                uncertainty: state.params.variance(),
                known: true,
            },
            None => {
                let prior = self.uniform_params(law_id);
                CalibratedConfidence {
                    confidence: prior.mean(),
                    uncertainty: prior.variance(),
                    known: false,
                }
            }
        }
    }

    /// Calibration quality from the law's retained records
    ///
    /// Unknown laws and laws with too few records report insufficient data.
    pub fn get_calibration_metrics(&self, law_id: &str) -> CalibrationReport {
        let records = self
            .laws
            .get(law_id)
            .map(|state| state.records.iter())
            .into_iter()
            .flatten();
        compute_metrics(law_id, records, &self.config)
    }

    /// Current parameters of a law
    pub fn params(&self, law_id: &str) -> Option<&BetaParams> {
        self.laws.get(law_id).map(|state| &state.params)
    }

    /// Retained calibration records of a law, oldest first
    pub fn records(&self, law_id: &str) -> Vec<&CalibrationRecord> {
        self.laws
            .get(law_id)
            .map(|state| state.records.iter().collect())
            .unwrap_or_default()
    }

    /// Known law ids in sorted order
    pub fn law_ids(&self) -> Vec<&str> {
        self.laws.keys().map(String::as_str).collect()
    }

    /// Forget a law entirely
    pub fn remove_law(&mut self, law_id: &str) -> Option<BetaParams> {
        self.laws.remove(law_id).map(|state| state.params)
    }

    /// Generate a summary report across all laws
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Calibration Summary".to_string(),
            "===================".to_string(),
            format!("Laws: {}", self.laws.len()),
        ];

        for (law_id, state) in &self.laws {
            let status = match self.get_calibration_metrics(law_id) {
                CalibrationReport::Calibrated(m) => format!(
                    "ECE {:.3}, Brier {:.3}{}",
                    m.expected_calibration_error,
                    m.brier_score,
                    if m.well_calibrated { ", well calibrated" } else { "" }
                ),
                CalibrationReport::InsufficientData { .. } => "insufficient data".to_string(),
            };
            lines.push(format!(
                "  {}: α={:.1} β={:.1} p={:.3} records={} ({})",
                law_id,
                state.params.alpha,
                state.params.beta,
                state.params.mean(),
                state.records.len(),
                status
            ));
        }

        lines.join("\n")
    }
}

impl Default for BetaCalibrator {
    fn default() -> Self {
        Self::default_config()
    }
}
