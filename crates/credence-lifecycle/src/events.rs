//! Lifecycle events
//!
//! Every mutation appends an event to a bounded log that callers can poll,
//! and broadcasts it to any live subscribers. Nothing is delivered through
//! callbacks, so there is no hidden control flow inside the lifecycle.

use credence_domain::{EvidenceId, HypothesisId, Timestamp, Transition};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Something that happened to a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A hypothesis was created
    HypothesisCreated {
        /// New hypothesis
        hypothesis_id: HypothesisId,
        /// Creation time
        timestamp: Timestamp,
    },

    /// Evidence was appended
    EvidenceAdded {
        /// Hypothesis the evidence belongs to
        hypothesis_id: HypothesisId,
        /// New evidence
        evidence_id: EvidenceId,
        /// Whether it was intervention evidence
        intervention: bool,
        /// Hypothesis confidence after the evidence was applied
        confidence: f64,
        /// When it was added
        timestamp: Timestamp,
    },

    /// Status changed, manually or automatically
    StatusChanged(Transition),
}

impl LifecycleEvent {
    /// Hypothesis the event concerns
    pub fn hypothesis_id(&self) -> HypothesisId {
        match self {
            LifecycleEvent::HypothesisCreated { hypothesis_id, .. }
            | LifecycleEvent::EvidenceAdded { hypothesis_id, .. } => *hypothesis_id,
            LifecycleEvent::StatusChanged(transition) => transition.hypothesis_id,
        }
    }
}

/// Bounded append-only log with broadcast fan-out
#[derive(Debug)]
pub(crate) struct EventLog {
    entries: VecDeque<LifecycleEvent>,
    capacity: usize,
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventLog {
    pub(crate) fn new(capacity: usize, channel_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            sender,
        }
    }

    pub(crate) fn push(&mut self, event: LifecycleEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        // No receivers is not an error for us
        let _ = self.sender.send(event.clone());
        self.entries.push_back(event);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &LifecycleEvent> {
        self.entries.iter()
    }

    pub(crate) fn drain(&mut self) -> Vec<LifecycleEvent> {
        self.entries.drain(..).collect()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}
