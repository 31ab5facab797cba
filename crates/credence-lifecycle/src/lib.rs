//! Credence Hypothesis Lifecycle
//!
//! State machine that moves hypotheses through
//! `proposed → gathering → {supported, weak} → archived`, with revival from
//! the archive back to gathering.
//!
//! ## Responsibilities
//!
//! - Create hypotheses and append evidence to them
//! - Recompute confidence from learning evidence only
//! - Apply automatic support/weak transitions once enough evidence exists
//! - Validate manual transitions against the transition table
//! - Report the inbox, stale hypotheses and evidence statistics
//!
//! ## Transition table
//!
//! | From      | Allowed targets              |
//! |-----------|------------------------------|
//! | proposed  | gathering, archived          |
//! | gathering | supported, weak, archived    |
//! | supported | archived                     |
//! | weak      | gathering, archived          |
//! | archived  | gathering                    |
//!
//! ## Notifications
//!
//! There are no callbacks. Each mutation returns its result, and an event
//! is appended to a bounded log ([`HypothesisLifecycle::events`]) and
//! broadcast to subscribers ([`HypothesisLifecycle::subscribe`]).

#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod lifecycle;
mod statistics;

pub use config::LifecycleConfig;
pub use error::LifecycleError;
pub use events::LifecycleEvent;
pub use lifecycle::HypothesisLifecycle;
pub use statistics::{EvidenceStatistics, LifecycleStatistics};
