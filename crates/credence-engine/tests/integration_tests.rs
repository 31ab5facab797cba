//! Integration tests for the engine facade

use credence_calibrator::CalibrationReport;
use credence_domain::{EvidenceInput, ManualClock, NewHypothesis, Priority, Status};
use credence_engine::{ConfigError, Engine, EngineConfig, EngineError};
use credence_lifecycle::LifecycleEvent;
use credence_store::MemoryStore;
use credence_weighter::WeightEvent;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

const HOUR_MS: u64 = 3_600_000;

fn engine_at(start: u64, config: EngineConfig) -> (Engine, ManualClock) {
    let clock = ManualClock::new(start);
    let engine = Engine::with_store(MemoryStore::new(), config, Arc::new(clock.clone()));
    (engine, clock)
}

#[test]
fn test_engine_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[weighter]
max_weight = 2.0

[lifecycle]
min_evidence = 2
support_threshold = 0.65
"#
    )
    .unwrap();

    let mut engine = Engine::from_config_file(file.path()).unwrap();
    assert_eq!(engine.weighter().config().max_weight, 2.0);
    assert_eq!(engine.lifecycle().config().min_evidence, 2);

    let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));
    engine
        .lifecycle_mut()
        .transition_status(h.id, Status::Gathering, "start")
        .unwrap();
    for _ in 0..2 {
        engine
            .observe(h.id, &WeightEvent::new(5.0, 1.0), EvidenceInput::supporting(0.4))
            .unwrap();
    }
    // 0.4 supporting → 0.7 ≥ 0.65
    assert_eq!(
        engine.lifecycle().get_hypothesis(h.id).unwrap().status,
        Status::Supported
    );
}

#[test]
fn test_config_file_errors() {
    let err = Engine::from_config_file("/no/such/dir/credence.toml").err().unwrap();
    assert!(matches!(err, EngineError::Config(ConfigError::FileRead(_))));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[calibrator]\nhit_tolerance = inf").unwrap();
    let err = Engine::from_config_file(file.path()).err().unwrap();
    assert!(matches!(err, EngineError::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_fresh_events_outweigh_stale_ones() {
    let now = 100 * HOUR_MS;
    let (mut engine, _) = engine_at(now, EngineConfig::default());
    let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));

    let fresh = engine
        .observe(
            h.id,
            &WeightEvent::new(10.0, 1.0).at(now),
            EvidenceInput::supporting(0.9),
        )
        .unwrap();
    let stale = engine
        .observe(
            h.id,
            &WeightEvent::new(10.0, 1.0).at(now - 24 * HOUR_MS),
            EvidenceInput::contradicting(0.9),
        )
        .unwrap();

    assert!(fresh.weight.final_weight > stale.weight.final_weight);
    // Fresh support dominates stale contradiction
    assert!(engine.lifecycle().get_hypothesis(h.id).unwrap().confidence > 0.5);
}

#[test]
fn test_interventions_through_observe_do_not_learn() {
    let (mut engine, _) = engine_at(HOUR_MS, EngineConfig::default());
    let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));
    engine
        .lifecycle_mut()
        .transition_status(h.id, Status::Gathering, "start")
        .unwrap();

    for _ in 0..10 {
        engine
            .observe(
                h.id,
                &WeightEvent::new(100.0, 0.01).of_type("critical"),
                EvidenceInput::supporting(1.0).intervention(),
            )
            .unwrap();
    }

    let hypothesis = engine.lifecycle().get_hypothesis(h.id).unwrap();
    assert_eq!(hypothesis.confidence, 0.0);
    assert_eq!(hypothesis.status, Status::Gathering);
    assert_eq!(hypothesis.metadata.total_evidence, 10);
    assert_eq!(engine.weighter().statistics().count, 10);
}

#[test]
fn test_calibration_round_trip() {
    let (mut engine, _) = engine_at(0, EngineConfig::default());
    let h = engine.lifecycle_mut().create_hypothesis(NewHypothesis::new("h"));
    engine
        .lifecycle_mut()
        .add_evidence(h.id, EvidenceInput::supporting(0.8))
        .unwrap();
    let law = h.id.to_string();

    assert!(matches!(
        engine.calibrator().get_calibration_metrics(&law),
        CalibrationReport::InsufficientData { .. }
    ));

    for i in 0..12 {
        let actual = if i % 3 == 0 { json!("no") } else { json!("yes") };
        engine.record_outcome(h.id, &json!("yes"), &actual).unwrap();
    }

    let report = engine.calibrator().get_calibration_metrics(&law);
    let metrics = report.metrics().unwrap();
    assert_eq!(metrics.sample_size, 12);
    assert!((0.0..=1.0).contains(&metrics.expected_calibration_error));
    assert!((0.0..=1.0).contains(&metrics.brier_score));

    let calibrated = engine.calibrated_confidence(h.id);
    assert!(calibrated.known);
    // Beta(1 + 8, 1 + 4)
    assert!((calibrated.confidence - 9.0 / 14.0).abs() < 1e-12);
}

#[test]
fn test_engine_events_and_inbox() {
    let (mut engine, clock) = engine_at(0, EngineConfig::default());
    let mut rx = engine.lifecycle().subscribe();

    let low = engine
        .lifecycle_mut()
        .create_hypothesis(NewHypothesis::new("low").with_priority(Priority::Low));
    clock.advance(10);
    let high = engine
        .lifecycle_mut()
        .create_hypothesis(NewHypothesis::new("high").with_priority(Priority::High));
    engine
        .observe(low.id, &WeightEvent::new(1.0, 1.0), EvidenceInput::default())
        .unwrap();

    let inbox: Vec<_> = engine.lifecycle().get_inbox().iter().map(|h| h.id).collect();
    assert_eq!(inbox, vec![high.id, low.id]);

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event);
    }
    assert_eq!(received.len(), 3);
    assert!(matches!(received[2], LifecycleEvent::EvidenceAdded { .. }));
}
