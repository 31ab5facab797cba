//! Credence Engine
//!
//! Facade over the three calibration components:
//!
//! - [`credence_weighter`]: turns raw `(signal, noise, timestamp, type)`
//!   observations into bounded weights
//! - [`credence_calibrator`]: Beta-Bernoulli calibration of stated
//!   confidence against observed outcomes
//! - [`credence_lifecycle`]: hypothesis state machine and evidence
//!   aggregation
//!
//! It also owns the ambient pieces the components leave to the embedding
//! application: TOML configuration ([`EngineConfig`]) and tracing setup
//! ([`init_tracing`]).
//!
//! ## Configuration
//!
//! ```toml
//! [weighter]
//! max_weight = 3.0
//! half_life_ms = 3600000
//!
//! [calibrator]
//! hit_tolerance = 0.1
//!
//! [lifecycle]
//! min_evidence = 5
//! support_threshold = 0.7
//! weak_threshold = 0.3
//! ```

#![warn(missing_docs)]

pub mod config;
mod engine;
pub mod error;
mod telemetry;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, Observation};
pub use error::EngineError;
pub use telemetry::init_tracing;
