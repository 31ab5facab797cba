//! Hypothesis module - the tracked belief

use crate::confidence;
use crate::evidence::{Evidence, EvidenceRecord};
use crate::ids::HypothesisId;
use crate::status::Status;
use crate::traits::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage priority for the inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Look at first
    High,
    /// Normal
    #[default]
    Medium,
    /// Look at last
    Low,
}

impl Priority {
    /// Sort rank, lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Get the priority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Parse a priority from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bookkeeping kept alongside a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisMetadata {
    /// Creation time
    pub created: Timestamp,
    /// Last change to status or confidence
    pub last_updated: Timestamp,
    /// Last evidence or transition
    pub last_activity: Timestamp,
    /// All evidence, interventions included
    pub total_evidence: usize,
    /// Supporting learning evidence
    pub supporting_evidence: usize,
    /// Contradicting learning evidence
    pub contradicting_evidence: usize,
}

impl HypothesisMetadata {
    /// Learning evidence count (supporting + contradicting)
    pub fn learning_evidence(&self) -> usize {
        self.supporting_evidence + self.contradicting_evidence
    }

    /// Intervention evidence count
    ///
    /// Saturates at zero for counters restored from an inconsistent snapshot.
    pub fn intervention_evidence(&self) -> usize {
        self.total_evidence.saturating_sub(self.learning_evidence())
    }
}

/// Caller-supplied fields for a new hypothesis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewHypothesis {
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Who proposed it
    pub proposed_by: String,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Inbox priority
    pub priority: Priority,
}

impl NewHypothesis {
    /// Start a new hypothesis description with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the proposer
    pub fn proposed_by(mut self, proposer: impl Into<String>) -> Self {
        self.proposed_by = proposer.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A tracked belief
///
/// Created in [`Status::Proposed`] with confidence 0 and no evidence.
/// Never deleted: [`Status::Archived`] stands in for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Unique identifier
    pub id: HypothesisId,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Who proposed it
    pub proposed_by: String,
    /// Lifecycle status
    pub status: Status,
    /// Evidence-derived confidence [0.0, 1.0]
    pub confidence: f64,
    /// Evidence in insertion order
    pub evidence: Vec<Evidence>,
    /// Counters and timestamps
    pub metadata: HypothesisMetadata,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Inbox priority
    pub priority: Priority,
}

impl Hypothesis {
    /// Create a proposed hypothesis with no evidence
    pub fn new(id: HypothesisId, data: NewHypothesis, now: Timestamp) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            proposed_by: data.proposed_by,
            status: Status::Proposed,
            confidence: 0.0,
            evidence: Vec::new(),
            metadata: HypothesisMetadata {
                created: now,
                last_updated: now,
                last_activity: now,
                total_evidence: 0,
                supporting_evidence: 0,
                contradicting_evidence: 0,
            },
            tags: data.tags,
            priority: data.priority,
        }
    }

    /// Append evidence and update counters
    ///
    /// Learning evidence bumps the support/contradiction counters and
    /// recomputes confidence over all learning evidence. Intervention
    /// evidence is stored and counted in `total_evidence` only.
    ///
    /// Returns `true` when confidence was recomputed.
    pub fn record_evidence(&mut self, evidence: Evidence, now: Timestamp) -> bool {
        self.metadata.total_evidence += 1;
        self.metadata.last_activity = now;

        let learning = match evidence.as_learning() {
            Some(record) => {
                if record.supports {
                    self.metadata.supporting_evidence += 1;
                } else {
                    self.metadata.contradicting_evidence += 1;
                }
                true
            }
            None => false,
        };

        self.evidence.push(evidence);

        if learning {
            if let Some(confidence) = confidence::learning_confidence(&self.evidence) {
                self.confidence = confidence;
            }
            self.metadata.last_updated = now;
        }

        learning
    }

    /// Set the status and touch the timestamps
    ///
    /// Does not validate the transition; see the lifecycle for that.
    pub fn set_status(&mut self, status: Status, now: Timestamp) {
        self.status = status;
        self.metadata.last_updated = now;
        self.metadata.last_activity = now;
    }

    /// Learning evidence records in insertion order
    pub fn learning_evidence(&self) -> impl Iterator<Item = &EvidenceRecord> {
        self.evidence.iter().filter_map(Evidence::as_learning)
    }

    /// Learning evidence that carries weight, i.e. that can move confidence
    pub fn weighted_learning_evidence(&self) -> usize {
        self.learning_evidence().filter(|r| r.weight > 0.0).count()
    }

    /// Intervention evidence records in insertion order
    pub fn intervention_evidence(&self) -> impl Iterator<Item = &EvidenceRecord> {
        self.evidence
            .iter()
            .filter(|e| e.is_intervention())
            .map(Evidence::record)
    }

    /// Confidence with interventions folded in, for callers that want it
    ///
    /// Never written back to `confidence`.
    pub fn confidence_including_interventions(&self) -> Option<f64> {
        confidence::confidence_including_interventions(&self.evidence)
    }

    /// Whether there has been no activity since `cutoff`
    pub fn is_idle_since(&self, cutoff: Timestamp) -> bool {
        self.metadata.last_activity < cutoff
    }
}
