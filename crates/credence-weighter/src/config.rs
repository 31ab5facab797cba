//! Configuration for evidence weighting
//!
//! Defines the SNR curve, temporal decay, weight bounds and the event type
//! modifier table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Key of the fallback entry in the type modifier table
pub const DEFAULT_TYPE: &str = "default";

/// Configuration for the evidence weighter
///
/// # Examples
///
/// ```
/// use credence_weighter::WeighterConfig;
///
/// let config = WeighterConfig::default();
/// assert_eq!(config.max_weight, 3.0);
/// assert_eq!(config.type_modifier("critical"), 2.0);
/// assert_eq!(config.type_modifier("never-heard-of-it"), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeighterConfig {
    /// Smallest noise value used as a divisor
    pub noise_floor: f64,

    /// Lower clamp for the signal-to-noise ratio
    pub min_snr: f64,

    /// Upper clamp for the signal-to-noise ratio; also the normaliser
    pub max_snr: f64,

    /// Sensitivity exponent of the SNR curve (> 0; below 1 favours small gains)
    pub snr_alpha: f64,

    /// Lower bound of the final weight
    pub min_weight: f64,

    /// Upper bound of the final weight and of each amplifying component
    pub max_weight: f64,

    /// Weight used when a component cannot be computed
    pub default_weight: f64,

    /// Half-life of the temporal decay in milliseconds
    /// Default: 1 hour
    pub half_life_ms: u64,

    /// Temporal weight of a brand-new event
    pub immediacy_bonus: f64,

    /// Age below which the immediacy bonus applies, in milliseconds
    /// Default: 1 minute
    pub immediacy_window_ms: u64,

    /// Capacity of the weight history ring buffer
    pub history_capacity: usize,

    /// Per event type multiplier; unknown types use the `"default"` entry
    pub type_modifiers: BTreeMap<String, f64>,
}

fn default_type_modifiers() -> BTreeMap<String, f64> {
    [
        ("critical", 2.0),
        ("discovery", 1.5),
        ("confirmation", 1.2),
        ("contradiction", 1.3),
        ("routine", 0.8),
        ("noise", 0.5),
        (DEFAULT_TYPE, 1.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl Default for WeighterConfig {
    fn default() -> Self {
        Self {
            noise_floor: 0.01,
            min_snr: 0.1,
            max_snr: 100.0,
            snr_alpha: 0.5,
            min_weight: 0.1,
            max_weight: 3.0,
            default_weight: 1.0,
            half_life_ms: 3_600_000,
            immediacy_bonus: 1.5,
            immediacy_window_ms: 60_000,
            history_capacity: 1000,
            type_modifiers: default_type_modifiers(),
        }
    }
}

impl WeighterConfig {
    /// Conservative weighting: narrower bounds, faster decay
    ///
    /// For noisy feeds where no single event should dominate.
    pub fn strict() -> Self {
        Self {
            max_weight: 2.0,
            snr_alpha: 0.8,
            half_life_ms: 15 * 60_000,
            immediacy_bonus: 1.2,
            ..Self::default()
        }
    }

    /// Generous weighting: wider bounds, slower decay
    ///
    /// For sparse, trusted feeds where old events stay relevant.
    pub fn lenient() -> Self {
        Self {
            max_weight: 5.0,
            snr_alpha: 0.3,
            half_life_ms: 24 * 3_600_000,
            immediacy_bonus: 2.0,
            ..Self::default()
        }
    }

    /// Half-life as Duration
    pub fn half_life(&self) -> Duration {
        Duration::from_millis(self.half_life_ms)
    }

    /// Multiplier for an event type, falling back to the `"default"` entry
    pub fn type_modifier(&self, event_type: &str) -> f64 {
        self.type_modifiers
            .get(event_type)
            .or_else(|| self.type_modifiers.get(DEFAULT_TYPE))
            .copied()
            .unwrap_or(1.0)
    }

    /// Repair values that would break the weighting formulas
    ///
    /// Non-finite or non-positive values revert to their defaults and
    /// swapped bounds are reordered. `max_weight` is raised to at least 1.
    /// Nothing is rejected.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive_or(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        self.noise_floor = positive_or(self.noise_floor, defaults.noise_floor);
        self.min_snr = positive_or(self.min_snr, defaults.min_snr);
        self.max_snr = positive_or(self.max_snr, defaults.max_snr);
        if self.min_snr > self.max_snr {
            std::mem::swap(&mut self.min_snr, &mut self.max_snr);
        }
        self.snr_alpha = positive_or(self.snr_alpha, defaults.snr_alpha);

        self.min_weight = positive_or(self.min_weight, defaults.min_weight);
        self.max_weight = positive_or(self.max_weight, defaults.max_weight);
        if self.min_weight > self.max_weight {
            std::mem::swap(&mut self.min_weight, &mut self.max_weight);
        }
        // Amplifying components scale by (max_weight - 1)
        self.max_weight = self.max_weight.max(1.0);
        self.default_weight = positive_or(self.default_weight, defaults.default_weight)
            .clamp(self.min_weight, self.max_weight);

        if self.half_life_ms == 0 {
            self.half_life_ms = defaults.half_life_ms;
        }
        self.immediacy_bonus = positive_or(self.immediacy_bonus, defaults.immediacy_bonus);
        if self.history_capacity == 0 {
            self.history_capacity = defaults.history_capacity;
        }

        self.type_modifiers
            .retain(|_, modifier| modifier.is_finite() && *modifier > 0.0);
        self.type_modifiers
            .entry(DEFAULT_TYPE.to_string())
            .or_insert(1.0);

        self
    }

    /// Apply a partial update, then sanitize
    pub fn apply(&mut self, patch: WeighterConfigPatch) {
        let mut next = self.clone();

        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(value) = patch.$field {
                    next.$field = value;
                })*
            };
        }
        take!(
            noise_floor,
            min_snr,
            max_snr,
            snr_alpha,
            min_weight,
            max_weight,
            default_weight,
            half_life_ms,
            immediacy_bonus,
            immediacy_window_ms,
            history_capacity
        );

        if let Some(modifiers) = patch.type_modifiers {
            next.type_modifiers.extend(modifiers);
        }

        *self = next.sanitized();
    }
}

/// Partial configuration accepted by `EvidenceWeighter::configure`
///
/// Only the fields that are `Some` change. Type modifiers are merged into
/// the existing table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeighterConfigPatch {
    /// See [`WeighterConfig::noise_floor`]
    pub noise_floor: Option<f64>,
    /// See [`WeighterConfig::min_snr`]
    pub min_snr: Option<f64>,
    /// See [`WeighterConfig::max_snr`]
    pub max_snr: Option<f64>,
    /// See [`WeighterConfig::snr_alpha`]
    pub snr_alpha: Option<f64>,
    /// See [`WeighterConfig::min_weight`]
    pub min_weight: Option<f64>,
    /// See [`WeighterConfig::max_weight`]
    pub max_weight: Option<f64>,
    /// See [`WeighterConfig::default_weight`]
    pub default_weight: Option<f64>,
    /// See [`WeighterConfig::half_life_ms`]
    pub half_life_ms: Option<u64>,
    /// See [`WeighterConfig::immediacy_bonus`]
    pub immediacy_bonus: Option<f64>,
    /// See [`WeighterConfig::immediacy_window_ms`]
    pub immediacy_window_ms: Option<u64>,
    /// See [`WeighterConfig::history_capacity`]
    pub history_capacity: Option<usize>,
    /// Entries merged into [`WeighterConfig::type_modifiers`]
    pub type_modifiers: Option<BTreeMap<String, f64>>,
}
