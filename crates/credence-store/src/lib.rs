//! Credence Storage Layer
//!
//! Implements the [`HypothesisStore`] trait with an owned, in-memory
//! structure. Each engine owns its own store, so independent engines can
//! coexist and be tested in isolation; there is no module-level registry.
//!
//! The store is serializable as a whole. Persisting it is left to the
//! caller, in whatever format they choose.
//!
//! # Examples
//!
//! ```
//! use credence_domain::{Hypothesis, HypothesisId, HypothesisStore, NewHypothesis};
//! use credence_store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! let id = HypothesisId::new();
//! store.insert(Hypothesis::new(id, NewHypothesis::new("tides follow the moon"), 0));
//! assert!(store.get(id).is_some());
//! ```

#![warn(missing_docs)]

use credence_domain::{Hypothesis, HypothesisId, HypothesisStore, Transition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory implementation of HypothesisStore
///
/// Hypotheses are keyed by their UUIDv7 id, so iteration follows creation
/// order. The transition log is append-only.
///
/// # Thread Safety
///
/// The store has no interior locking. Wrap it (or the lifecycle that owns
/// it) in a mutex, or give it to a single writer task, when sharing across
/// threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    hypotheses: BTreeMap<HypothesisId, Hypothesis>,
    transitions: Vec<Transition>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all stored hypotheses, in creation order
    pub fn ids(&self) -> Vec<HypothesisId> {
        self.hypotheses.keys().copied().collect()
    }
}

impl HypothesisStore for MemoryStore {
    fn insert(&mut self, hypothesis: Hypothesis) {
        tracing::trace!(hypothesis_id = %hypothesis.id, "storing hypothesis");
        self.hypotheses.insert(hypothesis.id, hypothesis);
    }

    fn get(&self, id: HypothesisId) -> Option<&Hypothesis> {
        self.hypotheses.get(&id)
    }

    fn get_mut(&mut self, id: HypothesisId) -> Option<&mut Hypothesis> {
        self.hypotheses.get_mut(&id)
    }

    fn hypotheses(&self) -> Vec<&Hypothesis> {
        self.hypotheses.values().collect()
    }

    fn len(&self) -> usize {
        self.hypotheses.len()
    }

    fn record_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}
