//! Status module - lifecycle stages for hypotheses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status in the hypothesis lifecycle
///
/// Hypotheses move through stages as evidence accumulates:
/// - Proposed: freshly created, not yet collecting evidence
/// - Gathering: collecting evidence, eligible for automatic transitions
/// - Supported: evidence clearly favours the hypothesis
/// - Weak: evidence clearly disfavours the hypothesis
/// - Archived: retired; stands in for deletion and can be revived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Newly created
    Proposed,

    /// Accumulating evidence
    Gathering,

    /// Confidence crossed the support threshold
    Supported,

    /// Confidence fell below the weak threshold
    Weak,

    /// Retired (revivable)
    Archived,
}

impl Status {
    /// Every status, in lifecycle order
    pub const ALL: [Status; 5] = [
        Status::Proposed,
        Status::Gathering,
        Status::Supported,
        Status::Weak,
        Status::Archived,
    ];

    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Proposed => "proposed",
            Status::Gathering => "gathering",
            Status::Supported => "supported",
            Status::Weak => "weak",
            Status::Archived => "archived",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "proposed" => Some(Status::Proposed),
            "gathering" => Some(Status::Gathering),
            "supported" => Some(Status::Supported),
            "weak" => Some(Status::Weak),
            "archived" => Some(Status::Archived),
            _ => None,
        }
    }

    /// Statuses reachable from this one in a single transition
    pub fn allowed_targets(&self) -> &'static [Status] {
        match self {
            Status::Proposed => &[Status::Gathering, Status::Archived],
            Status::Gathering => &[Status::Supported, Status::Weak, Status::Archived],
            Status::Supported => &[Status::Archived],
            Status::Weak => &[Status::Gathering, Status::Archived],
            // Revival is the only way out of the archive
            Status::Archived => &[Status::Gathering],
        }
    }

    /// Check whether `target` is a legal next status
    pub fn can_transition_to(&self, target: Status) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Whether the hypothesis still awaits a verdict (proposed or gathering)
    pub fn is_open(&self) -> bool {
        matches!(self, Status::Proposed | Status::Gathering)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}
