//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the state or
//! time sources the caller injects. Implementations live in other crates
//! (the in-memory store) or below (clocks).

use crate::{Hypothesis, HypothesisId, Transition};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock; clones share the same time
///
/// # Examples
///
/// ```
/// use credence_domain::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// let handle = clock.clone();
/// handle.advance(500);
/// assert_eq!(clock.now_ms(), 1_500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms`
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Owned storage for hypotheses and their transition log
///
/// Implemented by the infrastructure layer (credence-store). The lifecycle
/// takes `&mut self` for every mutation, which gives the single-writer
/// discipline per hypothesis for free.
pub trait HypothesisStore {
    /// Insert a hypothesis, replacing any with the same id
    fn insert(&mut self, hypothesis: Hypothesis);

    /// Get a hypothesis by ID
    fn get(&self, id: HypothesisId) -> Option<&Hypothesis>;

    /// Get a hypothesis by ID for mutation
    fn get_mut(&mut self, id: HypothesisId) -> Option<&mut Hypothesis>;

    /// All hypotheses, in id (creation) order
    fn hypotheses(&self) -> Vec<&Hypothesis>;

    /// Number of stored hypotheses
    fn len(&self) -> usize;

    /// Whether the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append to the transition log
    fn record_transition(&mut self, transition: Transition);

    /// Whole transition log, oldest first
    fn transitions(&self) -> &[Transition];

    /// Transitions of one hypothesis, oldest first
    fn transitions_for(&self, id: HypothesisId) -> Vec<&Transition> {
        self.transitions()
            .iter()
            .filter(|t| t.hypothesis_id == id)
            .collect()
    }
}
