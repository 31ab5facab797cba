//! Configuration for the hypothesis lifecycle
//!
//! Defines the auto-transition thresholds, staleness window and event
//! buffer sizes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DAY_MS: u64 = 86_400_000;

/// Configuration for the hypothesis lifecycle
///
/// # Examples
///
/// ```
/// use credence_lifecycle::LifecycleConfig;
///
/// let config = LifecycleConfig::default();
/// assert_eq!(config.min_evidence, 5);
/// assert_eq!(config.support_threshold, 0.7);
/// assert_eq!(config.weak_threshold, 0.3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Learning evidence required before automatic transitions are considered
    pub min_evidence: usize,

    /// Confidence at or above which a gathering hypothesis becomes supported
    pub support_threshold: f64,

    /// Confidence at or below which a gathering hypothesis becomes weak
    pub weak_threshold: f64,

    /// Inactivity after which an open hypothesis is reported stale (ms)
    /// Default: 7 days
    pub stale_after_ms: u64,

    /// Events retained in the pollable log (oldest evicted first)
    pub event_log_capacity: usize,

    /// Buffer of the broadcast channel handed to subscribers
    pub event_channel_capacity: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            min_evidence: 5,
            support_threshold: 0.7,
            weak_threshold: 0.3,
            stale_after_ms: 7 * DAY_MS,
            event_log_capacity: 1000,
            event_channel_capacity: 256,
        }
    }
}

impl LifecycleConfig {
    /// Demand more evidence and a wider margin before deciding
    pub fn strict() -> Self {
        Self {
            min_evidence: 10,
            support_threshold: 0.8,
            weak_threshold: 0.2,
            stale_after_ms: 3 * DAY_MS,
            ..Self::default()
        }
    }

    /// Decide early on thinner evidence
    pub fn lenient() -> Self {
        Self {
            min_evidence: 3,
            support_threshold: 0.6,
            weak_threshold: 0.4,
            stale_after_ms: 30 * DAY_MS,
            ..Self::default()
        }
    }

    /// Staleness window as Duration
    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    /// Repair values that would make the state machine misbehave
    ///
    /// Thresholds are clamped to [0, 1] and reordered so that
    /// `weak_threshold <= support_threshold`; zero capacities become one.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.support_threshold.is_finite() {
            self.support_threshold = defaults.support_threshold;
        }
        if !self.weak_threshold.is_finite() {
            self.weak_threshold = defaults.weak_threshold;
        }
        self.support_threshold = self.support_threshold.clamp(0.0, 1.0);
        self.weak_threshold = self.weak_threshold.clamp(0.0, 1.0);
        if self.weak_threshold > self.support_threshold {
            std::mem::swap(&mut self.weak_threshold, &mut self.support_threshold);
        }

        self.event_log_capacity = self.event_log_capacity.max(1);
        self.event_channel_capacity = self.event_channel_capacity.max(1);
        self
    }
}
