//! Error types for lifecycle operations

use credence_domain::{HypothesisId, Status};
use thiserror::Error;

fn join_statuses(statuses: &[Status]) -> String {
    statuses
        .iter()
        .map(Status::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by the hypothesis lifecycle
///
/// Both variants indicate a mistake at the call site and are returned
/// immediately. Malformed numeric input is never an error; it is
/// normalised instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// Status change not permitted by the transition table
    #[error(
        "Invalid transition for hypothesis {hypothesis_id}: {from} -> {to} (allowed: {})",
        join_statuses(.allowed)
    )]
    InvalidTransition {
        /// Hypothesis the change was attempted on
        hypothesis_id: HypothesisId,
        /// Current status
        from: Status,
        /// Requested status
        to: Status,
        /// Statuses reachable from `from`
        allowed: Vec<Status>,
    },

    /// Unknown hypothesis id
    #[error("Hypothesis not found: {0}")]
    NotFound(HypothesisId),
}
