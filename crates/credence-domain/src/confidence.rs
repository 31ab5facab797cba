//! Confidence aggregation over weighted evidence
//!
//! The aggregate is a weighted mean of signed evidence strengths mapped from
//! [-1, 1] onto [0, 1]:
//!
//! ```text
//! weighted_sum = Σ weight · confidence · (supports ? 1 : -1)
//! total_weight = Σ weight
//! confidence   = clamp((weighted_sum / total_weight + 1) / 2, 0, 1)
//! ```

use crate::evidence::{Evidence, EvidenceRecord};

/// Aggregate confidence over an arbitrary set of records
///
/// Returns `None` when there is nothing to aggregate (no records, or every
/// record has zero weight); callers keep their previous confidence then.
pub fn aggregate_confidence<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a EvidenceRecord>,
{
    let (weighted_sum, total_weight) = records
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), record| {
            (sum + record.signed_contribution(), total + record.weight)
        });

    if total_weight <= 0.0 || !total_weight.is_finite() {
        return None;
    }

    let raw = weighted_sum / total_weight;
    Some(((raw + 1.0) / 2.0).clamp(0.0, 1.0))
}

/// Aggregate confidence over learning evidence only
///
/// Intervention evidence is skipped, so operator overrides never move the
/// result. This is the formula that drives `Hypothesis::confidence`.
pub fn learning_confidence(evidence: &[Evidence]) -> Option<f64> {
    aggregate_confidence(evidence.iter().filter_map(Evidence::as_learning))
}

/// Aggregate confidence over learning and intervention evidence alike
///
/// Kept for callers that explicitly want interventions folded in; under
/// this formula equal-and-opposite interventions cancel to 0.5. It never
/// feeds the lifecycle.
pub fn confidence_including_interventions(evidence: &[Evidence]) -> Option<f64> {
    aggregate_confidence(evidence.iter().map(Evidence::record))
}
