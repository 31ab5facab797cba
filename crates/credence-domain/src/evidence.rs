//! Evidence module - observations attached to a hypothesis
//!
//! Evidence is either learning evidence, which feeds the confidence
//! aggregation, or intervention evidence injected by an operator, which is
//! kept for the audit trail only. The split is a variant rather than a flag
//! so the aggregation cannot be handed an intervention by mistake.

use crate::ids::EvidenceId;
use crate::traits::Timestamp;
use serde::{Deserialize, Serialize};

/// Evidence type used when the caller does not supply one
pub const DEFAULT_EVIDENCE_TYPE: &str = "observation";

/// Confidence used when the caller does not supply one
pub const DEFAULT_EVIDENCE_CONFIDENCE: f64 = 0.5;

/// Weight used when the caller does not supply one
pub const DEFAULT_EVIDENCE_WEIGHT: f64 = 1.0;

/// The immutable payload of one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Unique identifier
    pub id: EvidenceId,

    /// Free-form tag (e.g. "observation", "experiment")
    pub evidence_type: String,

    /// Who or what produced the observation
    pub source: String,

    /// Human-readable description
    pub description: String,

    /// Whether the observation supports (true) or contradicts (false) the hypothesis
    pub supports: bool,

    /// Strength of the observation [0.0, 1.0]
    pub confidence: f64,

    /// Relative weight, usually produced by an evidence weighter (>= 0.0)
    pub weight: f64,

    /// When the observation was recorded (ms since epoch)
    pub timestamp: Timestamp,

    /// Opaque caller data
    pub data: serde_json::Value,
}

impl EvidenceRecord {
    /// Signed contribution of this record: `weight * confidence * (±1)`
    pub fn signed_contribution(&self) -> f64 {
        let direction = if self.supports { 1.0 } else { -1.0 };
        self.weight * self.confidence * direction
    }
}

/// One observation attached to a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Evidence {
    /// Counted towards confidence and the support/contradiction counters
    Learning(EvidenceRecord),

    /// Operator override: persisted, never learned from
    Intervention(EvidenceRecord),
}

impl Evidence {
    /// Access the record regardless of variant
    pub fn record(&self) -> &EvidenceRecord {
        match self {
            Evidence::Learning(record) | Evidence::Intervention(record) => record,
        }
    }

    /// The record, only if this is learning evidence
    pub fn as_learning(&self) -> Option<&EvidenceRecord> {
        match self {
            Evidence::Learning(record) => Some(record),
            Evidence::Intervention(_) => None,
        }
    }

    /// Whether this is intervention evidence
    pub fn is_intervention(&self) -> bool {
        matches!(self, Evidence::Intervention(_))
    }

    /// Evidence identifier
    pub fn id(&self) -> EvidenceId {
        self.record().id
    }

    /// Whether the evidence supports the hypothesis
    pub fn supports(&self) -> bool {
        self.record().supports
    }
}

/// Caller-supplied description of new evidence
///
/// Unset fields take the documented defaults when the evidence is built:
/// type `"observation"`, supports `true`, confidence `0.5`, weight `1.0`,
/// not an intervention.
///
/// # Examples
///
/// ```
/// use credence_domain::EvidenceInput;
///
/// let input = EvidenceInput::supporting(0.9)
///     .with_weight(1.8)
///     .with_source("sensor:north");
/// assert_eq!(input.supports, Some(true));
/// assert!(!input.intervention);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceInput {
    /// Free-form tag
    pub evidence_type: Option<String>,
    /// Producer of the observation
    pub source: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Support (true) or contradiction (false)
    pub supports: Option<bool>,
    /// Strength [0.0, 1.0]
    pub confidence: Option<f64>,
    /// Relative weight (>= 0.0)
    pub weight: Option<f64>,
    /// Operator override that must not be learned from
    pub intervention: bool,
    /// Observation time; defaults to the time the evidence is added
    pub timestamp: Option<Timestamp>,
    /// Opaque caller data
    pub data: Option<serde_json::Value>,
}

impl EvidenceInput {
    /// Supporting evidence with the given confidence
    pub fn supporting(confidence: f64) -> Self {
        Self {
            supports: Some(true),
            confidence: Some(confidence),
            ..Default::default()
        }
    }

    /// Contradicting evidence with the given confidence
    pub fn contradicting(confidence: f64) -> Self {
        Self {
            supports: Some(false),
            confidence: Some(confidence),
            ..Default::default()
        }
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the evidence type tag
    pub fn with_type(mut self, evidence_type: impl Into<String>) -> Self {
        self.evidence_type = Some(evidence_type.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the observation timestamp
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach opaque data
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Mark as operator intervention
    pub fn intervention(mut self) -> Self {
        self.intervention = true;
        self
    }

    /// Build the evidence, filling defaults and normalising numbers
    ///
    /// Non-finite confidence falls back to the default and is clamped to
    /// [0, 1]; non-finite weight falls back to the default and negative
    /// weight becomes zero.
    pub fn into_evidence(self, id: EvidenceId, now: Timestamp) -> Evidence {
        let confidence = match self.confidence {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            _ => DEFAULT_EVIDENCE_CONFIDENCE,
        };
        let weight = match self.weight {
            Some(w) if w.is_finite() => w.max(0.0),
            _ => DEFAULT_EVIDENCE_WEIGHT,
        };

        let record = EvidenceRecord {
            id,
            evidence_type: self
                .evidence_type
                .unwrap_or_else(|| DEFAULT_EVIDENCE_TYPE.to_string()),
            source: self.source.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            supports: self.supports.unwrap_or(true),
            confidence,
            weight,
            timestamp: self.timestamp.unwrap_or(now),
            data: self.data.unwrap_or(serde_json::Value::Null),
        };

        if self.intervention {
            Evidence::Intervention(record)
        } else {
            Evidence::Learning(record)
        }
    }
}
