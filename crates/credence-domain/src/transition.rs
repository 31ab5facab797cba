//! Transition module - audit trail of status changes

use crate::ids::HypothesisId;
use crate::status::Status;
use crate::traits::Timestamp;
use serde::{Deserialize, Serialize};

/// One status change, appended on every transition and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Hypothesis that changed
    pub hypothesis_id: HypothesisId,
    /// Status before the change
    pub from: Status,
    /// Status after the change
    pub to: Status,
    /// Caller-supplied or automatic reason
    pub reason: String,
    /// When it happened
    pub timestamp: Timestamp,
    /// Hypothesis confidence at the moment of the change
    pub confidence_at_transition: f64,
    /// Whether the lifecycle made the change on its own
    #[serde(default)]
    pub automatic: bool,
}
