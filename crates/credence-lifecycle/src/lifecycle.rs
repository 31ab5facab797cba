//! Hypothesis lifecycle implementation

use crate::error::LifecycleError;
use crate::events::{EventLog, LifecycleEvent};
use crate::statistics::{EvidenceStatistics, LifecycleStatistics};
use crate::LifecycleConfig;
use credence_domain::{
    Clock, Evidence, EvidenceId, EvidenceInput, Hypothesis, HypothesisId, HypothesisStore,
    NewHypothesis, Status, SystemClock, Timestamp, Transition,
};
use credence_store::MemoryStore;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Drives hypotheses through their lifecycle
///
/// Owns an injected [`HypothesisStore`] and mutates it only through
/// `&mut self`, so a single lifecycle is a single writer. Every mutation is
/// returned to the caller and also appended to an event log that can be
/// polled with [`events`](Self::events) or followed with
/// [`subscribe`](Self::subscribe).
///
/// # Examples
///
/// ```
/// use credence_domain::{EvidenceInput, NewHypothesis, Status};
/// use credence_lifecycle::HypothesisLifecycle;
///
/// let mut lifecycle = HypothesisLifecycle::default_config();
/// let h = lifecycle.create_hypothesis(NewHypothesis::new("cache misses track deploys"));
/// lifecycle.transition_status(h.id, Status::Gathering, "collecting").unwrap();
///
/// for _ in 0..5 {
///     lifecycle.add_evidence(h.id, EvidenceInput::supporting(0.9)).unwrap();
/// }
/// assert_eq!(lifecycle.get_hypothesis(h.id).unwrap().status, Status::Supported);
/// ```
pub struct HypothesisLifecycle<S: HypothesisStore = MemoryStore> {
    store: S,
    config: LifecycleConfig,
    clock: Arc<dyn Clock>,
    events: EventLog,
}

impl HypothesisLifecycle<MemoryStore> {
    /// Create a lifecycle over an empty in-memory store
    pub fn new(config: LifecycleConfig) -> Self {
        Self::with_store(MemoryStore::new(), config, Arc::new(SystemClock))
    }

    /// Create a lifecycle with default configuration
    pub fn default_config() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

impl<S: HypothesisStore> HypothesisLifecycle<S> {
    /// Create a lifecycle over an existing store and clock
    pub fn with_store(store: S, config: LifecycleConfig, clock: Arc<dyn Clock>) -> Self {
        let config = config.sanitized();
        let events = EventLog::new(config.event_log_capacity, config.event_channel_capacity);
        Self {
            store,
            config,
            clock,
            events,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the lifecycle and keep the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> Timestamp {
        self.clock.now_ms()
    }

    /// Create a hypothesis in [`Status::Proposed`] with confidence 0
    pub fn create_hypothesis(&mut self, data: NewHypothesis) -> Hypothesis {
        let now = self.now();
        let hypothesis = Hypothesis::new(HypothesisId::new(), data, now);

        tracing::info!(
            hypothesis_id = %hypothesis.id,
            title = %hypothesis.title,
            "Hypothesis created"
        );

        self.store.insert(hypothesis.clone());
        self.events.push(LifecycleEvent::HypothesisCreated {
            hypothesis_id: hypothesis.id,
            timestamp: now,
        });
        hypothesis
    }

    /// Append evidence to a hypothesis
    ///
    /// Missing fields take their defaults and non-finite numbers are
    /// normalised. Learning evidence recomputes confidence and then runs the
    /// automatic transition check; intervention evidence is stored and
    /// counted in `total_evidence` but changes nothing else.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown id.
    pub fn add_evidence(
        &mut self,
        hypothesis_id: HypothesisId,
        input: EvidenceInput,
    ) -> Result<Evidence, LifecycleError> {
        let now = self.now();
        let hypothesis = self
            .store
            .get_mut(hypothesis_id)
            .ok_or(LifecycleError::NotFound(hypothesis_id))?;

        if input.confidence.is_some_and(|c| !c.is_finite())
            || input.weight.is_some_and(|w| !w.is_finite() || w < 0.0)
        {
            tracing::warn!(
                hypothesis_id = %hypothesis_id,
                confidence = ?input.confidence,
                weight = ?input.weight,
                "Normalising malformed evidence input"
            );
        }

        let evidence = input.into_evidence(EvidenceId::new(), now);
        let learning = hypothesis.record_evidence(evidence.clone(), now);
        let confidence = hypothesis.confidence;

        tracing::debug!(
            hypothesis_id = %hypothesis_id,
            evidence_id = %evidence.id(),
            intervention = evidence.is_intervention(),
            supports = evidence.supports(),
            confidence,
            "Evidence added"
        );

        self.events.push(LifecycleEvent::EvidenceAdded {
            hypothesis_id,
            evidence_id: evidence.id(),
            intervention: evidence.is_intervention(),
            confidence,
            timestamp: now,
        });

        if learning {
            self.check_auto_transitions(hypothesis_id)?;
        }

        Ok(evidence)
    }

    /// Move a hypothesis to a new status
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown id and
    /// [`LifecycleError::InvalidTransition`] when the transition table does
    /// not allow the change.
    pub fn transition_status(
        &mut self,
        hypothesis_id: HypothesisId,
        status: Status,
        reason: impl Into<String>,
    ) -> Result<Hypothesis, LifecycleError> {
        self.apply_transition(hypothesis_id, status, reason.into(), false)?;
        self.get_hypothesis(hypothesis_id).cloned()
    }

    /// Apply the automatic support/weak rule to one hypothesis
    ///
    /// Only a gathering hypothesis with at least `min_evidence` learning
    /// evidence of positive weight is considered. Zero-weight evidence never
    /// produces a confidence, so it cannot unlock a transition either.
    /// Returns the transition if one was made.
    pub fn check_auto_transitions(
        &mut self,
        hypothesis_id: HypothesisId,
    ) -> Result<Option<Transition>, LifecycleError> {
        let hypothesis = self.get_hypothesis(hypothesis_id)?;

        if hypothesis.status != Status::Gathering {
            return Ok(None);
        }
        let learning = hypothesis.weighted_learning_evidence();
        if learning == 0 || learning < self.config.min_evidence {
            return Ok(None);
        }

        let confidence = hypothesis.confidence;
        let (target, reason) = if confidence >= self.config.support_threshold {
            (
                Status::Supported,
                format!(
                    "confidence {:.3} reached support threshold {:.3} after {} observations",
                    confidence, self.config.support_threshold, learning
                ),
            )
        } else if confidence <= self.config.weak_threshold {
            (
                Status::Weak,
                format!(
                    "confidence {:.3} fell to weak threshold {:.3} after {} observations",
                    confidence, self.config.weak_threshold, learning
                ),
            )
        } else {
            return Ok(None);
        };

        self.apply_transition(hypothesis_id, target, reason, true).map(Some)
    }

    fn apply_transition(
        &mut self,
        hypothesis_id: HypothesisId,
        to: Status,
        reason: String,
        automatic: bool,
    ) -> Result<Transition, LifecycleError> {
        let now = self.now();
        let hypothesis = self
            .store
            .get_mut(hypothesis_id)
            .ok_or(LifecycleError::NotFound(hypothesis_id))?;

        let from = hypothesis.status;
        if !from.can_transition_to(to) {
            tracing::debug!(
                hypothesis_id = %hypothesis_id,
                from = %from,
                to = %to,
                "Rejected status transition"
            );
            return Err(LifecycleError::InvalidTransition {
                hypothesis_id,
                from,
                to,
                allowed: from.allowed_targets().to_vec(),
            });
        }

        hypothesis.set_status(to, now);
        let transition = Transition {
            hypothesis_id,
            from,
            to,
            reason,
            timestamp: now,
            confidence_at_transition: hypothesis.confidence,
            automatic,
        };

        tracing::info!(
            hypothesis_id = %hypothesis_id,
            from = %from,
            to = %to,
            automatic,
            confidence = transition.confidence_at_transition,
            reason = %transition.reason,
            "Hypothesis status changed"
        );

        self.store.record_transition(transition.clone());
        self.events.push(LifecycleEvent::StatusChanged(transition.clone()));
        Ok(transition)
    }

    /// Get a hypothesis by id
    pub fn get_hypothesis(&self, hypothesis_id: HypothesisId) -> Result<&Hypothesis, LifecycleError> {
        self.store
            .get(hypothesis_id)
            .ok_or(LifecycleError::NotFound(hypothesis_id))
    }

    /// Proposed and gathering hypotheses, high priority first, then most
    /// recently active first
    pub fn get_inbox(&self) -> Vec<&Hypothesis> {
        let mut inbox: Vec<&Hypothesis> = self
            .store
            .hypotheses()
            .into_iter()
            .filter(|h| h.status.is_open())
            .collect();

        inbox.sort_by(|a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then_with(|| b.metadata.last_activity.cmp(&a.metadata.last_activity))
        });
        inbox
    }

    /// Hypotheses in the given status, in creation order
    pub fn get_by_status(&self, status: Status) -> Vec<&Hypothesis> {
        self.store
            .hypotheses()
            .into_iter()
            .filter(|h| h.status == status)
            .collect()
    }

    /// Open hypotheses with no activity within the staleness window
    ///
    /// A report only; archiving them is left to the caller.
    pub fn check_stale_hypotheses(&self) -> Vec<&Hypothesis> {
        let cutoff = self.stale_cutoff();
        self.store
            .hypotheses()
            .into_iter()
            .filter(|h| h.status.is_open() && h.is_idle_since(cutoff))
            .collect()
    }

    fn stale_cutoff(&self) -> Timestamp {
        self.now().saturating_sub(self.config.stale_after_ms)
    }

    /// Evidence counts for one hypothesis
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotFound`] for an unknown id.
    pub fn get_evidence_statistics(
        &self,
        hypothesis_id: HypothesisId,
    ) -> Result<EvidenceStatistics, LifecycleError> {
        self.get_hypothesis(hypothesis_id)
            .map(EvidenceStatistics::from_hypothesis)
    }

    /// Aggregate statistics over every hypothesis
    pub fn get_statistics(&self) -> LifecycleStatistics {
        LifecycleStatistics::collect(
            self.store.hypotheses(),
            self.store.transitions(),
            self.stale_cutoff(),
        )
    }

    /// Audit trail of one hypothesis, oldest first
    pub fn transitions(&self, hypothesis_id: HypothesisId) -> Vec<&Transition> {
        self.store.transitions_for(hypothesis_id)
    }

    /// Retained events, oldest first
    pub fn events(&self) -> Vec<&LifecycleEvent> {
        self.events.iter().collect()
    }

    /// Take every retained event, leaving the log empty
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        self.events.drain()
    }

    /// Receive every event emitted from now on
    ///
    /// Slow receivers lag rather than block the lifecycle.
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.events.subscribe()
    }
}
