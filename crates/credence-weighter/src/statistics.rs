//! Running statistics over computed weights

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregates over every weight computed since the last reset
///
/// The histogram buckets weights by their integer part, so with the default
/// bounds the keys are 0, 1, 2 and 3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightStatistics {
    /// Number of weights computed
    pub count: u64,

    /// Running mean of final weights
    pub mean: f64,

    /// Largest final weight seen
    pub max: f64,

    /// Count of weights per integer bucket
    pub histogram: BTreeMap<u32, u64>,

    /// Calls in which at least one input had to be normalised
    pub normalized_inputs: u64,
}

impl WeightStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one final weight into the aggregates
    pub fn record(&mut self, weight: f64) {
        self.count += 1;
        self.mean += (weight - self.mean) / self.count as f64;
        if self.count == 1 || weight > self.max {
            self.max = weight;
        }
        *self.histogram.entry(weight.floor() as u32).or_insert(0) += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Weight Statistics".to_string(),
            "=================".to_string(),
            format!("Events weighed: {}", self.count),
            format!("Mean weight: {:.3}", self.mean),
            format!("Max weight: {:.3}", self.max),
            format!("Normalized inputs: {}", self.normalized_inputs),
        ];

        if !self.histogram.is_empty() {
            lines.push(String::new());
            lines.push("Histogram:".to_string());
            for (bucket, count) in &self.histogram {
                lines.push(format!("  [{}, {}): {}", bucket, bucket + 1, count));
            }
        }

        lines.join("\n")
    }
}
