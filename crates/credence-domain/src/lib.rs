//! Credence Domain Layer
//!
//! This crate contains the core value types shared by every other layer:
//! hypotheses, the evidence attached to them, their lifecycle status and the
//! transition audit trail. It performs no I/O and owns no registries; state
//! lives in a [`traits::HypothesisStore`] that callers inject.
//!
//! ## Key Concepts
//!
//! - **Hypothesis**: a tracked belief with a status and an evidence-derived confidence
//! - **Evidence**: one weighted observation, either learning or intervention
//! - **Status**: lifecycle stage (proposed → gathering → supported/weak → archived)
//! - **Transition**: immutable record of a status change
//!
//! ## Intervention evidence
//!
//! Evidence injected by an operator is modelled as [`Evidence::Intervention`].
//! It is kept in the hypothesis history but the confidence aggregation only
//! ever sees [`Evidence::Learning`] records.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod evidence;
pub mod hypothesis;
pub mod ids;
pub mod status;
pub mod traits;
pub mod transition;

// Re-exports for convenience
pub use evidence::{Evidence, EvidenceInput, EvidenceRecord};
pub use hypothesis::{Hypothesis, HypothesisMetadata, NewHypothesis, Priority};
pub use ids::{EvidenceId, HypothesisId};
pub use status::Status;
pub use traits::{Clock, HypothesisStore, ManualClock, SystemClock, Timestamp};
pub use transition::Transition;
