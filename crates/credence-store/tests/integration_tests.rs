//! Integration tests for credence-store
//!
//! These tests exercise the store purely through the HypothesisStore trait.

use credence_domain::{
    Hypothesis, HypothesisId, HypothesisStore, NewHypothesis, Status, Transition,
};
use credence_store::MemoryStore;

fn hypothesis(value: u128, title: &str) -> Hypothesis {
    Hypothesis::new(HypothesisId::from_value(value), NewHypothesis::new(title), 1_000)
}

fn transition(id: HypothesisId, from: Status, to: Status) -> Transition {
    Transition {
        hypothesis_id: id,
        from,
        to,
        reason: "test".to_string(),
        timestamp: 2_000,
        confidence_at_transition: 0.0,
        automatic: false,
    }
}

#[test]
fn test_insert_and_get() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());

    store.insert(hypothesis(1, "first"));
    store.insert(hypothesis(2, "second"));

    assert_eq!(store.len(), 2);
    let retrieved = store.get(HypothesisId::from_value(1)).unwrap();
    assert_eq!(retrieved.title, "first");
    assert!(store.get(HypothesisId::from_value(3)).is_none());
}

#[test]
fn test_iteration_follows_id_order() {
    let mut store = MemoryStore::new();
    store.insert(hypothesis(30, "c"));
    store.insert(hypothesis(10, "a"));
    store.insert(hypothesis(20, "b"));

    let titles: Vec<_> = store.hypotheses().iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert_eq!(
        store.ids(),
        vec![
            HypothesisId::from_value(10),
            HypothesisId::from_value(20),
            HypothesisId::from_value(30)
        ]
    );
}

#[test]
fn test_get_mut_persists_changes() {
    let mut store = MemoryStore::new();
    let id = HypothesisId::from_value(1);
    store.insert(hypothesis(1, "mutable"));

    store.get_mut(id).unwrap().set_status(Status::Gathering, 5_000);

    let h = store.get(id).unwrap();
    assert_eq!(h.status, Status::Gathering);
    assert_eq!(h.metadata.last_activity, 5_000);
}

#[test]
fn test_transitions_filtered_by_hypothesis() {
    let mut store = MemoryStore::new();
    let a = HypothesisId::from_value(1);
    let b = HypothesisId::from_value(2);

    store.record_transition(transition(a, Status::Proposed, Status::Gathering));
    store.record_transition(transition(b, Status::Proposed, Status::Archived));
    store.record_transition(transition(a, Status::Gathering, Status::Supported));

    assert_eq!(store.transitions().len(), 3);
    let for_a = store.transitions_for(a);
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[1].to, Status::Supported);
}

#[test]
fn test_store_serializes() {
    let mut store = MemoryStore::new();
    let id = HypothesisId::from_value(7);
    store.insert(hypothesis(7, "persist me"));
    store.record_transition(transition(id, Status::Proposed, Status::Gathering));

    let json = serde_json::to_string(&store).unwrap();
    let restored: MemoryStore = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.get(id), store.get(id));
    assert_eq!(restored.transitions(), store.transitions());
}
