//! Engine facade composing the weighter, calibrator and lifecycle

use crate::config::EngineConfig;
use crate::error::EngineError;
use credence_calibrator::{BetaCalibrator, BetaUpdate, CalibratedConfidence};
use credence_domain::{Clock, Evidence, EvidenceInput, HypothesisId, HypothesisStore, SystemClock};
use credence_lifecycle::HypothesisLifecycle;
use credence_store::MemoryStore;
use credence_weighter::{EvidenceWeighter, WeightEvent, WeightRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Result of [`Engine::observe`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// How the raw event was weighed
    pub weight: WeightRecord,
    /// Evidence appended to the hypothesis
    pub evidence: Evidence,
}

/// One weighter, one calibrator and one lifecycle sharing a clock
///
/// Hypotheses double as calibration laws: the law id is the hypothesis id
/// in its string form.
///
/// # Examples
///
/// ```
/// use credence_domain::{EvidenceInput, NewHypothesis, Status};
/// use credence_engine::{Engine, EngineConfig};
/// use credence_weighter::WeightEvent;
/// use serde_json::json;
///
/// let mut engine = Engine::new(EngineConfig::default());
/// let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("queue depth predicts lag"));
///
/// let observation = engine
///     .observe(h.id, &WeightEvent::new(8.0, 1.0).of_type("confirmation"), EvidenceInput::supporting(0.7))
///     .unwrap();
/// assert!(observation.evidence.record().weight > 0.0);
///
/// engine.record_outcome(h.id, &json!(true), &json!(true)).unwrap();
/// assert!(engine.calibrated_confidence(h.id).known);
/// ```
pub struct Engine<S: HypothesisStore = MemoryStore> {
    weighter: EvidenceWeighter,
    calibrator: BetaCalibrator,
    lifecycle: HypothesisLifecycle<S>,
}

impl Engine<MemoryStore> {
    /// Create an engine over an empty in-memory store on the system clock
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(MemoryStore::new(), config, Arc::new(SystemClock))
    }

    /// Create an engine from a TOML configuration file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        Ok(Self::new(EngineConfig::from_file(path)?))
    }
}

impl<S: HypothesisStore> Engine<S> {
    /// Create an engine over an existing store, sharing one clock
    pub fn with_store(store: S, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::info!(
            max_weight = config.weighter.max_weight,
            half_life_ms = config.weighter.half_life_ms,
            min_evidence = config.lifecycle.min_evidence,
            support_threshold = config.lifecycle.support_threshold,
            weak_threshold = config.lifecycle.weak_threshold,
            "Starting credence engine"
        );

        Self {
            weighter: EvidenceWeighter::with_clock(config.weighter, Arc::clone(&clock)),
            calibrator: BetaCalibrator::new(config.calibrator),
            lifecycle: HypothesisLifecycle::with_store(store, config.lifecycle, clock),
        }
    }

    /// Weigh a raw event and append it to a hypothesis as evidence
    ///
    /// The computed weight multiplies any weight the caller already set on
    /// the evidence. The event timestamp becomes the evidence timestamp
    /// unless the evidence carries its own.
    pub fn observe(
        &mut self,
        hypothesis_id: HypothesisId,
        event: &WeightEvent,
        mut evidence: EvidenceInput,
    ) -> Result<Observation, EngineError> {
        // Fail before touching weighter statistics
        self.lifecycle.get_hypothesis(hypothesis_id)?;

        let weight = self.weighter.calculate_event_weight(event);
        let base = evidence.weight.filter(|w| w.is_finite()).unwrap_or(1.0);
        evidence.weight = Some(base * weight.final_weight);
        if evidence.timestamp.is_none() {
            evidence.timestamp = event.timestamp;
        }
        if evidence.evidence_type.is_none() {
            evidence.evidence_type = event.event_type.clone();
        }

        let evidence = self.lifecycle.add_evidence(hypothesis_id, evidence)?;
        Ok(Observation { weight, evidence })
    }

    /// Score a prediction made on behalf of a hypothesis
    ///
    /// The hypothesis's current confidence is recorded as the stated
    /// confidence, so calibration metrics measure how well the
    /// evidence-derived confidence tracks reality.
    pub fn record_outcome(
        &mut self,
        hypothesis_id: HypothesisId,
        predicted: &Value,
        actual: &Value,
    ) -> Result<BetaUpdate, EngineError> {
        let stated = self.lifecycle.get_hypothesis(hypothesis_id)?.confidence;
        Ok(self.calibrator.update_with_stated_confidence(
            &hypothesis_id.to_string(),
            stated,
            predicted,
            actual,
        ))
    }

    /// Calibrated confidence of a hypothesis's law
    pub fn calibrated_confidence(&self, hypothesis_id: HypothesisId) -> CalibratedConfidence {
        self.calibrator
            .get_calibrated_confidence(&hypothesis_id.to_string())
    }

    /// Get the weighter
    pub fn weighter(&self) -> &EvidenceWeighter {
        &self.weighter
    }

    /// Get the weighter for reconfiguration
    pub fn weighter_mut(&mut self) -> &mut EvidenceWeighter {
        &mut self.weighter
    }

    /// Get the calibrator
    pub fn calibrator(&self) -> &BetaCalibrator {
        &self.calibrator
    }

    /// Get the calibrator for law management
    pub fn calibrator_mut(&mut self) -> &mut BetaCalibrator {
        &mut self.calibrator
    }

    /// Get the lifecycle
    pub fn lifecycle(&self) -> &HypothesisLifecycle<S> {
        &self.lifecycle
    }

    /// Get the lifecycle for hypothesis management
    pub fn lifecycle_mut(&mut self) -> &mut HypothesisLifecycle<S> {
        &mut self.lifecycle
    }

    /// Give up the engine and keep the store
    pub fn into_store(self) -> S {
        self.lifecycle.into_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_domain::{ManualClock, NewHypothesis, Status};
    use credence_lifecycle::LifecycleError;

    fn engine() -> (Engine, ManualClock) {
        let clock = ManualClock::new(10_000_000);
        let engine = Engine::with_store(
            MemoryStore::new(),
            EngineConfig::default(),
            Arc::new(clock.clone()),
        );
        (engine, clock)
    }

    #[test]
    fn test_observe_uses_computed_weight() {
        let (mut engine, clock) = engine();
        let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));

        let event = WeightEvent::new(10.0, 1.0)
            .at(clock.now_ms() - 2 * 3_600_000)
            .of_type("routine");
        let observation = engine
            .observe(h.id, &event, EvidenceInput::supporting(0.9).with_weight(2.0))
            .unwrap();

        let record = observation.evidence.record();
        assert!((record.weight - 2.0 * observation.weight.final_weight).abs() < 1e-12);
        assert_eq!(record.timestamp, event.timestamp.unwrap());
        assert_eq!(record.evidence_type, "routine");
        assert_eq!(engine.weighter().statistics().count, 1);
    }

    #[test]
    fn test_observe_unknown_hypothesis() {
        let (mut engine, _) = engine();
        let id = HypothesisId::new();

        let err = engine
            .observe(id, &WeightEvent::new(1.0, 1.0), EvidenceInput::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Lifecycle(LifecycleError::NotFound(_))));
        assert_eq!(engine.weighter().statistics().count, 0);
    }

    #[test]
    fn test_observe_drives_auto_transition() {
        let (mut engine, _) = engine();
        let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));
        engine
            .lifecycle_mut()
            .transition_status(h.id, Status::Gathering, "start")
            .unwrap();

        for _ in 0..5 {
            engine
                .observe(h.id, &WeightEvent::new(50.0, 1.0), EvidenceInput::supporting(0.9))
                .unwrap();
        }
        assert_eq!(
            engine.lifecycle().get_hypothesis(h.id).unwrap().status,
            Status::Supported
        );
    }

    #[test]
    fn test_record_outcome_uses_hypothesis_confidence() {
        let (mut engine, _) = engine();
        let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));
        engine
            .lifecycle_mut()
            .add_evidence(h.id, EvidenceInput::supporting(0.6))
            .unwrap();

        let update = engine
            .record_outcome(h.id, &Value::from(1.0), &Value::from(1.05))
            .unwrap();
        assert!(update.hit);

        let law = h.id.to_string();
        let records = engine.calibrator().records(&law);
        assert_eq!(records.len(), 1);
        assert!((records[0].nominal_confidence - 0.8).abs() < 1e-12);
        assert!(engine.calibrated_confidence(h.id).known);
    }

    #[test]
    fn test_calibrated_confidence_unknown() {
        let (engine, _) = engine();
        let calibrated = engine.calibrated_confidence(HypothesisId::new());
        assert!(!calibrated.known);
        assert_eq!(calibrated.confidence, 0.5);
    }
}
