//! Evidence and lifecycle statistics

use credence_domain::{Hypothesis, HypothesisId, Status, Transition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evidence counts for one hypothesis, split by kind and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceStatistics {
    /// Hypothesis the counts belong to
    pub hypothesis_id: HypothesisId,

    /// All evidence
    pub total: usize,

    /// Evidence that feeds confidence
    pub learning: usize,

    /// Operator-injected evidence
    pub intervention: usize,

    /// Supporting learning evidence
    pub supporting: usize,

    /// Contradicting learning evidence
    pub contradicting: usize,

    /// Supporting intervention evidence
    pub intervention_supporting: usize,

    /// Contradicting intervention evidence
    pub intervention_contradicting: usize,

    /// Summed weight of learning evidence
    pub learning_weight: f64,

    /// Current confidence
    pub confidence: f64,
}

impl EvidenceStatistics {
    /// Tally the evidence of a hypothesis
    pub fn from_hypothesis(hypothesis: &Hypothesis) -> Self {
        let mut stats = Self {
            hypothesis_id: hypothesis.id,
            total: hypothesis.evidence.len(),
            learning: 0,
            intervention: 0,
            supporting: 0,
            contradicting: 0,
            intervention_supporting: 0,
            intervention_contradicting: 0,
            learning_weight: 0.0,
            confidence: hypothesis.confidence,
        };

        for record in hypothesis.learning_evidence() {
            stats.learning += 1;
            stats.learning_weight += record.weight;
            if record.supports {
                stats.supporting += 1;
            } else {
                stats.contradicting += 1;
            }
        }

        for record in hypothesis.intervention_evidence() {
            stats.intervention += 1;
            if record.supports {
                stats.intervention_supporting += 1;
            } else {
                stats.intervention_contradicting += 1;
            }
        }

        stats
    }
}

/// Aggregate view over every hypothesis in a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleStatistics {
    /// Hypotheses tracked
    pub total_hypotheses: usize,

    /// Hypotheses per status
    pub by_status: BTreeMap<Status, usize>,

    /// Evidence across all hypotheses
    pub total_evidence: usize,

    /// Learning evidence across all hypotheses
    pub learning_evidence: usize,

    /// Intervention evidence across all hypotheses
    pub intervention_evidence: usize,

    /// Transitions recorded
    pub transitions: usize,

    /// Transitions made by the lifecycle itself
    pub automatic_transitions: usize,

    /// Mean confidence over hypotheses with learning evidence
    pub average_confidence: Option<f64>,

    /// Open hypotheses idle past the staleness window
    pub stale: usize,
}

impl LifecycleStatistics {
    /// Aggregate over hypotheses and the transition log
    pub fn collect<'a>(
        hypotheses: impl IntoIterator<Item = &'a Hypothesis>,
        transitions: &[Transition],
        stale_cutoff: u64,
    ) -> Self {
        let mut stats = Self::default();
        let mut confidence_sum = 0.0;
        let mut confident = 0usize;

        for hypothesis in hypotheses {
            stats.total_hypotheses += 1;
            *stats.by_status.entry(hypothesis.status).or_insert(0) += 1;

            let learning = hypothesis.metadata.learning_evidence();
            stats.total_evidence += hypothesis.metadata.total_evidence;
            stats.learning_evidence += learning;
            stats.intervention_evidence += hypothesis.metadata.intervention_evidence();

            if learning > 0 {
                confidence_sum += hypothesis.confidence;
                confident += 1;
            }
            if hypothesis.status.is_open() && hypothesis.is_idle_since(stale_cutoff) {
                stats.stale += 1;
            }
        }

        stats.transitions = transitions.len();
        stats.automatic_transitions = transitions.iter().filter(|t| t.automatic).count();
        stats.average_confidence = (confident > 0).then(|| confidence_sum / confident as f64);
        stats
    }

    /// Hypotheses in a status
    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Lifecycle Statistics Summary".to_string(),
            "============================".to_string(),
            format!("Hypotheses: {}", self.total_hypotheses),
        ];

        for status in Status::ALL {
            lines.push(format!("  {}: {}", status, self.count(status)));
        }

        lines.push(format!(
            "Evidence: {} ({} learning, {} intervention)",
            self.total_evidence, self.learning_evidence, self.intervention_evidence
        ));
        lines.push(format!(
            "Transitions: {} ({} automatic)",
            self.transitions, self.automatic_transitions
        ));
        if let Some(avg) = self.average_confidence {
            lines.push(format!("Average confidence: {:.3}", avg));
        }
        lines.push(format!("Stale: {}", self.stale));

        lines.join("\n")
    }
}
