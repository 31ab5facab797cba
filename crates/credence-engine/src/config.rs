//! Configuration file parsing for the engine.
//!
//! Groups the weighter, calibrator and lifecycle settings under their own
//! TOML tables. Every table and every field is optional.

use credence_calibrator::CalibratorConfig;
use credence_lifecycle::LifecycleConfig;
use credence_weighter::WeighterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Engine configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value the engine cannot use
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Engine configuration loaded from TOML
///
/// # Examples
///
/// ```
/// use credence_engine::EngineConfig;
///
/// let config = EngineConfig::from_toml_str(r#"
///     [lifecycle]
///     min_evidence = 3
///
///     [weighter.type_modifiers]
///     critical = 2.5
/// "#).unwrap();
///
/// assert_eq!(config.lifecycle.min_evidence, 3);
/// assert_eq!(config.weighter.type_modifier("critical"), 2.5);
/// assert_eq!(config.calibrator.min_records, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `[weighter]` table
    pub weighter: WeighterConfig,

    /// `[calibrator]` table
    pub calibrator: CalibratorConfig,

    /// `[lifecycle]` table
    pub lifecycle: LifecycleConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    ///
    /// Type-modifier tables are merged over the defaults, so a file only
    /// has to name the entries it changes.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(contents)?;

        let mut modifiers = WeighterConfig::default().type_modifiers;
        modifiers.append(&mut config.weighter.type_modifiers);
        config.weighter.type_modifiers = modifiers;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that TOML can express but no component can use
    ///
    /// Programmatic configs are sanitised by each component instead; a file
    /// containing `nan` or `inf` is treated as a mistake.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weighter;
        let c = &self.calibrator;
        let l = &self.lifecycle;

        let numbers = [
            ("weighter.noise_floor", w.noise_floor),
            ("weighter.min_snr", w.min_snr),
            ("weighter.max_snr", w.max_snr),
            ("weighter.snr_alpha", w.snr_alpha),
            ("weighter.min_weight", w.min_weight),
            ("weighter.max_weight", w.max_weight),
            ("weighter.default_weight", w.default_weight),
            ("weighter.immediacy_bonus", w.immediacy_bonus),
            ("calibrator.total_pseudo_count", c.total_pseudo_count),
            ("calibrator.base_pseudo_count", c.base_pseudo_count),
            ("calibrator.hit_tolerance", c.hit_tolerance),
            ("calibrator.well_calibrated_threshold", c.well_calibrated_threshold),
            ("lifecycle.support_threshold", l.support_threshold),
            ("lifecycle.weak_threshold", l.weak_threshold),
        ];

        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }

        for (event_type, modifier) in &w.type_modifiers {
            if !modifier.is_finite() || *modifier <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weighter.type_modifiers.{event_type} must be a finite positive number, got {modifier}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [weighter]
            max_weight = 4.0
            half_life_ms = 60000

            [weighter.type_modifiers]
            incident = 1.8

            [calibrator]
            hit_tolerance = 0.05

            [lifecycle]
            support_threshold = 0.8
            stale_after_ms = 1000
        "#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.weighter.max_weight, 4.0);
        assert_eq!(config.weighter.half_life_ms, 60_000);
        assert_eq!(config.weighter.type_modifier("incident"), 1.8);
        // Defaults survive the merge
        assert_eq!(config.weighter.type_modifier("critical"), 2.0);
        assert_eq!(config.calibrator.hit_tolerance, 0.05);
        assert_eq!(config.lifecycle.support_threshold, 0.8);
        assert_eq!(config.lifecycle.weak_threshold, 0.3);
        assert_eq!(config.lifecycle.stale_after_ms, 1000);
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = EngineConfig::from_toml_str("[weighter]\nmax_weight = nan\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("weighter.max_weight"));
    }

    #[test]
    fn test_negative_modifier_rejected() {
        let err = EngineConfig::from_toml_str("[weighter.type_modifiers]\nnoise = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("weighter.type_modifiers.noise"));
    }

    #[test]
    fn test_zero_modifier_rejected() {
        let err = EngineConfig::from_toml_str("[weighter.type_modifiers]\nroutine = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("weighter.type_modifiers.routine"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = EngineConfig::from_toml_str("[lifecycle\nmin_evidence = 3").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/definitely/not/here/credence.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
