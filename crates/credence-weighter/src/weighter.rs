//! Core weighting implementation
//!
//! A weight is the geometric mean of three components, clamped to the
//! configured bounds:
//!
//! ```text
//! snr      = clamp(signal / max(noise, noise_floor), min_snr, max_snr)
//! snr_w    = 1 + (snr / max_snr)^alpha · (max_weight − 1)
//! temporal = immediacy bonus below the window, else 1 + 2^(−age/half_life) · (max_weight − 1)
//! final    = clamp(cbrt(snr_w · temporal · type_modifier), min_weight, max_weight)
//! ```

use crate::{WeightStatistics, WeighterConfig, WeighterConfigPatch};
use credence_domain::{Clock, SystemClock, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// One raw observation to be weighed
///
/// Every field is optional; missing signal or noise, or a missing
/// timestamp, yields the default weight for that component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightEvent {
    /// Signal strength (>= 0)
    pub signal: Option<f64>,
    /// Noise level (>= noise floor)
    pub noise: Option<f64>,
    /// When the event happened (ms since epoch)
    pub timestamp: Option<Timestamp>,
    /// Event type used for the modifier lookup
    pub event_type: Option<String>,
}

impl WeightEvent {
    /// Event with a signal and noise reading
    pub fn new(signal: f64, noise: f64) -> Self {
        Self {
            signal: Some(signal),
            noise: Some(noise),
            ..Default::default()
        }
    }

    /// Set the event time
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the event type
    pub fn of_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }
}

/// The three factors behind a final weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightComponents {
    /// Signal-to-noise weight
    pub snr: f64,
    /// Recency weight
    pub temporal: f64,
    /// Event type multiplier
    pub type_modifier: f64,
}

/// Result of weighing one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Bounded combined weight
    pub final_weight: f64,
    /// Individual factors
    pub components: WeightComponents,
    /// Event type as looked up (`"default"` when absent)
    pub event_type: String,
    /// When the weight was computed
    pub computed_at: Timestamp,
    /// Whether any input was NaN, infinite or negative
    pub normalized: bool,
}

/// Translates noisy, aging, heterogeneous observations into one scalar
///
/// Keeps a bounded history of computed weights and running statistics.
///
/// # Examples
///
/// ```
/// use credence_domain::ManualClock;
/// use credence_weighter::{EvidenceWeighter, WeightEvent, WeighterConfig};
///
/// let clock = ManualClock::new(10_000_000);
/// let mut weighter = EvidenceWeighter::with_clock(WeighterConfig::default(), clock);
///
/// let record = weighter.calculate_event_weight(
///     &WeightEvent::new(50.0, 1.0).at(10_000_000 - 120_000).of_type("discovery"),
/// );
/// assert!(record.final_weight > 1.0);
/// assert_eq!(weighter.statistics().count, 1);
/// ```
pub struct EvidenceWeighter {
    config: WeighterConfig,
    clock: Arc<dyn Clock>,
    history: VecDeque<WeightRecord>,
    statistics: WeightStatistics,
}

impl EvidenceWeighter {
    /// Create a weighter on the system clock
    pub fn new(config: WeighterConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a weighter with default configuration
    pub fn default_config() -> Self {
        Self::new(WeighterConfig::default())
    }

    /// Create a weighter on an injected clock
    pub fn with_clock(config: WeighterConfig, clock: impl Clock + 'static) -> Self {
        let config = config.sanitized();
        Self {
            history: VecDeque::with_capacity(config.history_capacity.min(1024)),
            config,
            clock: Arc::new(clock),
            statistics: WeightStatistics::new(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &WeighterConfig {
        &self.config
    }

    /// Apply a partial configuration update
    pub fn configure(&mut self, patch: WeighterConfigPatch) {
        self.config.apply(patch);
        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }
        tracing::debug!(config = ?self.config, "weighter reconfigured");
    }

    /// Weigh an event against the injected clock and record the result
    pub fn calculate_event_weight(&mut self, event: &WeightEvent) -> WeightRecord {
        let now = self.clock.now_ms();
        self.calculate_event_weight_at(event, now)
    }

    /// Weigh an event as of `now` and record the result
    pub fn calculate_event_weight_at(&mut self, event: &WeightEvent, now: Timestamp) -> WeightRecord {
        let record = self.compute_weight(event, now);

        if record.normalized {
            self.statistics.normalized_inputs += 1;
            tracing::warn!(?event, "normalized invalid numeric input while weighing event");
        }
        tracing::debug!(
            final_weight = record.final_weight,
            snr = record.components.snr,
            temporal = record.components.temporal,
            type_modifier = record.components.type_modifier,
            event_type = %record.event_type,
            "weighed event"
        );

        self.statistics.record(record.final_weight);
        if self.history.len() == self.config.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(record.clone());

        record
    }

    /// Weigh an event as of `now` without touching history or statistics
    pub fn compute_weight(&self, event: &WeightEvent, now: Timestamp) -> WeightRecord {
        let (snr, snr_normalized) = self.snr_weight(event.signal, event.noise);
        let temporal = self.temporal_weight(event.timestamp, now);
        let event_type = event
            .event_type
            .clone()
            .unwrap_or_else(|| crate::config::DEFAULT_TYPE.to_string());
        let type_modifier = self.config.type_modifier(&event_type);

        let mut normalized = snr_normalized;
        let mut final_weight = (snr * temporal * type_modifier).cbrt();
        if !final_weight.is_finite() {
            final_weight = self.config.default_weight;
            normalized = true;
        }
        let final_weight = final_weight.clamp(self.config.min_weight, self.config.max_weight);

        WeightRecord {
            final_weight,
            components: WeightComponents {
                snr,
                temporal,
                type_modifier,
            },
            event_type,
            computed_at: now,
            normalized,
        }
    }

    /// Signal-to-noise component; the flag reports normalised input
    fn snr_weight(&self, signal: Option<f64>, noise: Option<f64>) -> (f64, bool) {
        let (Some(signal), Some(noise)) = (signal, noise) else {
            // Missing readings bypass the formula entirely
            return (self.config.default_weight, false);
        };
        let cfg = &self.config;
        let mut normalized = false;

        let signal = if signal.is_nan() || signal < 0.0 {
            normalized = true;
            0.0
        } else {
            if signal.is_infinite() {
                normalized = true;
            }
            signal
        };

        let noise = if noise.is_nan() || noise < 0.0 {
            normalized = true;
            cfg.noise_floor
        } else {
            if noise.is_infinite() {
                normalized = true;
            }
            noise.max(cfg.noise_floor)
        };

        let mut snr = signal / noise;
        if snr.is_nan() {
            snr = cfg.min_snr;
        }
        let snr = snr.clamp(cfg.min_snr, cfg.max_snr);

        let n = snr / cfg.max_snr;
        (1.0 + n.powf(cfg.snr_alpha) * (cfg.max_weight - 1.0), normalized)
    }

    /// Recency component
    fn temporal_weight(&self, timestamp: Option<Timestamp>, now: Timestamp) -> f64 {
        let cfg = &self.config;
        let Some(timestamp) = timestamp else {
            return cfg.default_weight;
        };
        if timestamp > now {
            return cfg.default_weight;
        }

        let age = (now - timestamp) as f64;
        let window = cfg.immediacy_window_ms as f64;
        if age < window {
            return cfg.immediacy_bonus - (cfg.immediacy_bonus - 1.0) * (age / window);
        }

        let decay = (-std::f64::consts::LN_2 / cfg.half_life_ms as f64 * age).exp();
        1.0 + decay * (cfg.max_weight - 1.0)
    }

    /// Snapshot of the running statistics
    pub fn statistics(&self) -> WeightStatistics {
        self.statistics.clone()
    }

    /// The `n` most recent weight records, oldest first
    pub fn recent_weights(&self, n: usize) -> Vec<WeightRecord> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Number of records currently held in the history buffer
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear history and statistics
    pub fn reset_statistics(&mut self) {
        self.history.clear();
        self.statistics.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_domain::ManualClock;

    const NOW: Timestamp = 100_000_000;
    const HOUR: u64 = 3_600_000;

    fn weighter() -> EvidenceWeighter {
        EvidenceWeighter::with_clock(WeighterConfig::default(), ManualClock::new(NOW))
    }

    #[test]
    fn test_missing_readings_use_default_weight() {
        let w = weighter();
        let record = w.compute_weight(&WeightEvent::default(), NOW);

        assert_eq!(record.components.snr, 1.0);
        assert_eq!(record.components.temporal, 1.0);
        assert_eq!(record.components.type_modifier, 1.0);
        assert_eq!(record.final_weight, 1.0);
        assert!(!record.normalized);
    }

    #[test]
    fn test_missing_noise_bypasses_formula() {
        let w = weighter();
        let event = WeightEvent {
            signal: Some(1000.0),
            ..Default::default()
        };
        assert_eq!(w.compute_weight(&event, NOW).components.snr, 1.0);
    }

    #[test]
    fn test_snr_at_max_reaches_max_weight() {
        let w = weighter();
        let record = w.compute_weight(&WeightEvent::new(1000.0, 1.0), NOW);
        assert!((record.components.snr - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_snr_curve() {
        let w = weighter();
        // snr = 25, n = 0.25, sqrt(n) = 0.5, weight = 1 + 0.5 · 2 = 2
        let record = w.compute_weight(&WeightEvent::new(25.0, 1.0), NOW);
        assert!((record.components.snr - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_noise_floor() {
        let w = weighter();
        // noise 0 → 0.01, snr = 0.5 / 0.01 = 50
        let floored = w.compute_weight(&WeightEvent::new(0.5, 0.0), NOW);
        let explicit = w.compute_weight(&WeightEvent::new(0.5, 0.01), NOW);
        assert_eq!(floored.components.snr, explicit.components.snr);
    }

    #[test]
    fn test_immediacy_bonus() {
        let w = weighter();
        let fresh = w.compute_weight(&WeightEvent::default().at(NOW), NOW);
        assert!((fresh.components.temporal - 1.5).abs() < 1e-12);

        let half = w.compute_weight(&WeightEvent::default().at(NOW - 30_000), NOW);
        assert!((half.components.temporal - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_half_life_decay() {
        let w = weighter();
        // One half-life: 1 + 0.5 · 2 = 2
        let record = w.compute_weight(&WeightEvent::default().at(NOW - HOUR), NOW);
        assert!((record.components.temporal - 2.0).abs() < 1e-9);

        let old = w.compute_weight(&WeightEvent::default().at(NOW - 100 * HOUR), NOW);
        assert!((old.components.temporal - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_future_timestamp_uses_default() {
        let w = weighter();
        let record = w.compute_weight(&WeightEvent::default().at(NOW + 5_000), NOW);
        assert_eq!(record.components.temporal, 1.0);
    }

    #[test]
    fn test_type_modifier_lookup() {
        let w = weighter();
        let critical = w.compute_weight(&WeightEvent::default().of_type("critical"), NOW);
        let unknown = w.compute_weight(&WeightEvent::default().of_type("gossip"), NOW);

        assert_eq!(critical.components.type_modifier, 2.0);
        assert_eq!(unknown.components.type_modifier, 1.0);
        assert!((critical.final_weight - 2.0f64.cbrt()).abs() < 1e-12);
    }

    #[test]
    fn test_geometric_mean_combination() {
        let w = weighter();
        let event = WeightEvent::new(25.0, 1.0).at(NOW - HOUR).of_type("critical");
        let record = w.compute_weight(&event, NOW);
        // cbrt(2 · 2 · 2) = 2
        assert!((record.final_weight - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_inputs_are_normalized() {
        let w = weighter();
        for (signal, noise) in [
            (f64::NAN, 1.0),
            (1.0, f64::NAN),
            (f64::INFINITY, f64::INFINITY),
            (-5.0, -5.0),
            (f64::NEG_INFINITY, 0.0),
        ] {
            let record = w.compute_weight(&WeightEvent::new(signal, noise), NOW);
            assert!(record.final_weight.is_finite());
            assert!(record.final_weight >= 0.1 && record.final_weight <= 3.0);
            assert!(record.normalized, "{} / {} should be flagged", signal, noise);
        }
    }

    #[test]
    fn test_final_weight_clamped() {
        let mut w = weighter();
        w.configure(WeighterConfigPatch {
            min_weight: Some(0.9),
            ..Default::default()
        });
        let record = w.compute_weight(&WeightEvent::new(0.0, 1.0).of_type("noise").at(0), NOW);
        assert_eq!(record.final_weight, 0.9);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut w = weighter();
        w.configure(WeighterConfigPatch {
            history_capacity: Some(3),
            ..Default::default()
        });

        for i in 0..5 {
            w.calculate_event_weight(&WeightEvent::new(i as f64, 1.0));
        }

        assert_eq!(w.history_len(), 3);
        assert_eq!(w.statistics().count, 5);
        let recent = w.recent_weights(10);
        assert_eq!(recent.len(), 3);
        assert_eq!(w.recent_weights(1).len(), 1);
    }

    #[test]
    fn test_statistics_track_calls() {
        let mut w = weighter();
        w.calculate_event_weight(&WeightEvent::default());
        w.calculate_event_weight(&WeightEvent::new(f64::NAN, 1.0));

        let stats = w.statistics();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.normalized_inputs, 1);

        w.reset_statistics();
        assert_eq!(w.statistics().count, 0);
        assert_eq!(w.history_len(), 0);
    }

    #[test]
    fn test_uses_injected_clock() {
        let clock = ManualClock::new(NOW);
        let mut w = EvidenceWeighter::with_clock(WeighterConfig::default(), clock.clone());
        let event = WeightEvent::default().at(NOW);

        let fresh = w.calculate_event_weight(&event);
        clock.advance(HOUR);
        let aged = w.calculate_event_weight(&event);

        assert_eq!(fresh.computed_at, NOW);
        assert_eq!(aged.computed_at, NOW + HOUR);
        assert!((aged.components.temporal - 2.0).abs() < 1e-9);
    }
}
