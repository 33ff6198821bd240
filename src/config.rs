//! Configuration for the classification pipeline.
//!
//! [`PipelineConfig`] holds the tunables used while turning a window into a
//! feature vector and a prediction. [`AppConfig`] wraps it together with the
//! model location and is what the binary reads from TOML.
//!
//! # Example
//!
//! ```
//! use movement_classifier::{EulerConvention, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! assert_eq!(config.default_interval_ms, 500.0);
//!
//! let fixed = PipelineConfig::fixed_axis();
//! assert_eq!(fixed.euler_convention, EulerConvention::ExtrinsicZyx);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Sampling interval assumed when a request does not carry one.
pub const DEFAULT_INTERVAL_MS: f64 = 500.0;

/// How the three orientation angles compose into a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EulerConvention {
    /// Body-fixed axes: yaw about Z, then pitch about the new Y, then roll
    /// about the newest X. `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
    #[default]
    IntrinsicZyx,
    /// Space-fixed axes in the same order. `R = Rx(roll) * Ry(pitch) * Rz(yaw)`.
    ExtrinsicZyx,
}

/// Tunables for feature extraction and decisioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sampling interval (ms) used when the request omits `interval`.
    pub default_interval_ms: f64,

    /// Rotation convention for the orientation transform.
    pub euler_convention: EulerConvention,

    /// Allowed distance of the classifier's probability sum from 1.
    pub probability_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: DEFAULT_INTERVAL_MS,
            euler_convention: EulerConvention::IntrinsicZyx,
            probability_tolerance: 1e-6,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for artifacts trained on features rotated about space-fixed axes.
    #[must_use]
    pub fn fixed_axis() -> Self {
        Self {
            euler_convention: EulerConvention::ExtrinsicZyx,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !self.default_interval_ms.is_finite() || self.default_interval_ms <= 0.0 {
            return Err(ClassifierError::invalid_config(
                "default_interval_ms must be positive",
            ));
        }
        if !self.probability_tolerance.is_finite() || self.probability_tolerance <= 0.0 {
            return Err(ClassifierError::invalid_config(
                "probability_tolerance must be positive",
            ));
        }
        if self.probability_tolerance >= 1.0 {
            return Err(ClassifierError::invalid_config(
                "probability_tolerance must be < 1",
            ));
        }
        Ok(())
    }

    /// Set the default sampling interval.
    #[must_use]
    pub const fn with_default_interval_ms(mut self, interval_ms: f64) -> Self {
        self.default_interval_ms = interval_ms;
        self
    }

    /// Set the Euler convention.
    #[must_use]
    pub const fn with_euler_convention(mut self, convention: EulerConvention) -> Self {
        self.euler_convention = convention;
        self
    }

    /// Set the probability sum tolerance.
    #[must_use]
    pub const fn with_probability_tolerance(mut self, tolerance: f64) -> Self {
        self.probability_tolerance = tolerance;
        self
    }
}

/// Model artifact location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the LightGBM JSON model dump.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/lightgbm-model_v4.json"),
        }
    }
}

/// Top-level configuration read by the binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load and validate config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::invalid_config(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ClassifierError::invalid_config(e.to_string()))?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Generate TOML representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ClassifierError::invalid_config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_interval_ms, 500.0);
        assert_eq!(config.euler_convention, EulerConvention::IntrinsicZyx);
    }

    #[test]
    fn test_fixed_axis_preset() {
        let config = PipelineConfig::fixed_axis();
        assert!(config.validate().is_ok());
        assert_eq!(config.euler_convention, EulerConvention::ExtrinsicZyx);
        assert_eq!(config.default_interval_ms, 500.0);
    }

    #[test]
    fn test_validation() {
        let mut config = PipelineConfig::default();

        config.default_interval_ms = 0.0;
        assert!(config.validate().is_err());

        config.default_interval_ms = f64::NAN;
        assert!(config.validate().is_err());

        config.default_interval_ms = 250.0;
        config.probability_tolerance = -1.0;
        assert!(config.validate().is_err());

        config.probability_tolerance = 1e-3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_default_interval_ms(100.0)
            .with_euler_convention(EulerConvention::ExtrinsicZyx)
            .with_probability_tolerance(1e-4);
        assert_eq!(config.default_interval_ms, 100.0);
        assert_eq!(config.euler_convention, EulerConvention::ExtrinsicZyx);
        assert_eq!(config.probability_tolerance, 1e-4);
    }

    #[test]
    fn test_app_config_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[model]"));
        assert!(text.contains("[pipeline]"));

        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_app_config_partial_toml() {
        let parsed = AppConfig::from_toml(
            r#"
            [model]
            path = "artifacts/model.json"

            [pipeline]
            euler_convention = "extrinsic_zyx"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.model.path, PathBuf::from("artifacts/model.json"));
        assert_eq!(parsed.pipeline.euler_convention, EulerConvention::ExtrinsicZyx);
        assert_eq!(parsed.pipeline.default_interval_ms, 500.0);
    }

    #[test]
    fn test_app_config_rejects_bad_pipeline() {
        let result = AppConfig::from_toml(
            r#"
            [pipeline]
            default_interval_ms = -5.0
            "#,
        );
        assert!(matches!(result, Err(ClassifierError::InvalidConfig(_))));
    }
}
