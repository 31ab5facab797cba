//! Weighted parameter updates

use crate::EvidenceWeighter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One parameter folded from weighted updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Accumulated numeric value
    Numeric(f64),

    /// Latest non-numeric value with the total weight behind it
    Categorical {
        /// Most recent value
        value: Value,
        /// Running total of the weights of updates to this key
        confidence: f64,
    },
}

/// Parameters keyed by name
pub type WeightedParams = BTreeMap<String, ParamValue>;

impl EvidenceWeighter {
    /// Fold `update` into `params`, scaled by `weight`
    ///
    /// Numeric entries are deltas: the stored value grows by `delta · weight`
    /// (starting from zero). Other entries replace the stored value and add
    /// `weight` to that key's running confidence. A non-finite weight counts
    /// as 1.0 and a negative weight as 0.0.
    ///
    /// Pure: depends only on its arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use credence_weighter::{EvidenceWeighter, ParamValue, WeightedParams};
    /// use serde_json::json;
    ///
    /// let update = json!({"rate": 0.5, "mode": "burst"});
    /// let params = EvidenceWeighter::apply_weighted_update(
    ///     &WeightedParams::new(),
    ///     update.as_object().unwrap(),
    ///     2.0,
    /// );
    /// assert_eq!(params["rate"], ParamValue::Numeric(1.0));
    /// ```
    pub fn apply_weighted_update(
        params: &WeightedParams,
        update: &Map<String, Value>,
        weight: f64,
    ) -> WeightedParams {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 1.0 };
        let mut next = params.clone();

        for (key, value) in update {
            let folded = match (value.as_f64(), next.get(key)) {
                (Some(delta), Some(ParamValue::Numeric(current))) => {
                    ParamValue::Numeric(current + delta * weight)
                }
                (Some(delta), _) => ParamValue::Numeric(delta * weight),
                (None, Some(ParamValue::Categorical { confidence, .. })) => ParamValue::Categorical {
                    value: value.clone(),
                    confidence: confidence + weight,
                },
                (None, _) => ParamValue::Categorical {
                    value: value.clone(),
                    confidence: weight,
                },
            };
            next.insert(key.clone(), folded);
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(params: &WeightedParams, update: Value, weight: f64) -> WeightedParams {
        EvidenceWeighter::apply_weighted_update(params, update.as_object().unwrap(), weight)
    }

    #[test]
    fn test_numeric_deltas_scale_and_accumulate() {
        let params = apply(&WeightedParams::new(), json!({"rate": 1.0}), 2.0);
        let params = apply(&params, json!({"rate": 0.5}), 0.5);
        assert_eq!(params["rate"], ParamValue::Numeric(2.25));
    }

    #[test]
    fn test_categorical_accumulates_confidence() {
        let params = apply(&WeightedParams::new(), json!({"mode": "burst"}), 1.5);
        let params = apply(&params, json!({"mode": "steady"}), 0.5);

        assert_eq!(
            params["mode"],
            ParamValue::Categorical {
                value: json!("steady"),
                confidence: 2.0
            }
        );
    }

    #[test]
    fn test_input_untouched() {
        let original = apply(&WeightedParams::new(), json!({"rate": 1.0}), 1.0);
        let _ = apply(&original, json!({"rate": 1.0, "extra": true}), 1.0);
        assert_eq!(original.len(), 1);
        assert_eq!(original["rate"], ParamValue::Numeric(1.0));
    }

    #[test]
    fn test_bad_weight_normalized() {
        let params = apply(&WeightedParams::new(), json!({"a": 2.0}), f64::NAN);
        assert_eq!(params["a"], ParamValue::Numeric(2.0));

        let params = apply(&WeightedParams::new(), json!({"a": 2.0}), -4.0);
        assert_eq!(params["a"], ParamValue::Numeric(0.0));
    }

    #[test]
    fn test_numeric_replaces_categorical() {
        let params = apply(&WeightedParams::new(), json!({"k": "text"}), 1.0);
        let params = apply(&params, json!({"k": 3.0}), 1.0);
        assert_eq!(params["k"], ParamValue::Numeric(3.0));
    }
}
