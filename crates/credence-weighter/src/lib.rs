//! Credence Evidence Weighter
//!
//! Converts a raw observation `(signal, noise, timestamp, type)` into one
//! bounded scalar weight reflecting its signal quality and recency.
//!
//! # Overview
//!
//! - **SNR weight**: signal over floored noise, clamped and normalised, on a
//!   tunable power curve
//! - **Temporal weight**: a linear immediacy bonus inside the first minute,
//!   exponential half-life decay afterwards
//! - **Type modifier**: fixed lookup table with a `"default"` fallback
//! - **Combination**: geometric mean of the three, clamped to
//!   `[min_weight, max_weight]`
//!
//! Invalid numbers (NaN, infinities, negatives) are normalised, never
//! raised, so the result is always finite and within bounds.
//!
//! # Usage
//!
//! ```
//! use credence_weighter::{EvidenceWeighter, WeightEvent, WeighterConfig, WeighterConfigPatch};
//!
//! let mut weighter = EvidenceWeighter::new(WeighterConfig::default());
//! weighter.configure(WeighterConfigPatch {
//!     max_weight: Some(4.0),
//!     ..Default::default()
//! });
//!
//! let record = weighter.calculate_event_weight(&WeightEvent::new(f64::NAN, -1.0));
//! assert!(record.final_weight.is_finite());
//! println!("{}", weighter.statistics().summary());
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [weighter]
//! noise_floor = 0.01
//! min_snr = 0.1
//! max_snr = 100.0
//! snr_alpha = 0.5
//! min_weight = 0.1
//! max_weight = 3.0
//! half_life_ms = 3600000
//! immediacy_bonus = 1.5
//!
//! [weighter.type_modifiers]
//! critical = 2.0
//! default = 1.0
//! ```

#![warn(missing_docs)]

mod config;
mod statistics;
mod update;
mod weighter;

pub use config::{WeighterConfig, WeighterConfigPatch, DEFAULT_TYPE};
pub use statistics::WeightStatistics;
pub use update::{ParamValue, WeightedParams};
pub use weighter::{EvidenceWeighter, WeightComponents, WeightEvent, WeightRecord};
