//! Movement Classifier Library
//!
//! Pedestrian movement-state classification for indoor positioning.
//!
//! This library turns a short window of synchronized IMU and GPS samples
//! into a fixed 35-feature vector and scores it with a pretrained
//! three-class model (Halt, Forward, Turn). The result is used to correct
//! dead-reckoning drift.
//!
//! # Features
//!
//! - **World-frame features**: acceleration rotated by per-sample yaw, pitch, roll
//! - **FFT-based**: mean and dominant frequency per axis
//! - **Versioned schema**: feature order checked against the model at startup
//! - **Injectable models**: any [`Classifier`] can back the [`Predictor`]
//!
//! # Quick Start
//!
//! ```
//! use movement_classifier::{extract_features, mock_request, PipelineConfig, SensorWindow};
//!
//! let config = PipelineConfig::default();
//! let request = mock_request(10, 500);
//! let window = SensorWindow::from_request(&request, &config)?;
//!
//! let features = extract_features(&window, &config)?;
//! assert_eq!(features.len(), movement_classifier::FEATURE_COUNT);
//! # Ok::<(), movement_classifier::ClassifierError>(())
//! ```
//!
//! # Serving predictions
//!
//! ```no_run
//! use std::path::Path;
//! use movement_classifier::{handle_predict_movement, load_model, PipelineConfig, Predictor};
//!
//! let model = load_model(Path::new("models/lightgbm-model_v4.json"));
//! let predictor = Predictor::new(model, PipelineConfig::default())?;
//!
//! let response = handle_predict_movement(&predictor, r#"{"data": []}"#);
//! assert_eq!(response.status, 400);
//! # Ok::<(), movement_classifier::ClassifierError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod error;
pub mod extractor;
pub mod features;
pub mod math;
pub mod mock;
pub mod model;
pub mod predictor;
pub mod service;
pub mod validation;
pub mod window;

// Re-exports for convenient access
pub use config::{AppConfig, EulerConvention, ModelConfig, PipelineConfig};
pub use error::{ClassifierError, ErrorKind, Result};
pub use extractor::extract_features;
pub use features::{FeatureVector, NamedFeature, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
pub use mock::mock_request;
pub use model::{load_model, Classifier, GbdtModel, ModelHandle};
pub use predictor::{decide, Action, ClassProbabilities, PredictionResult, Predictor, CLASS_COUNT};
pub use service::{handle_predict_movement, ServiceResponse};
pub use validation::{validate_model_schema, SchemaReport};
pub use window::{SensorSample, SensorWindow, Timestamp, MIN_SAMPLES};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Linear;

    impl Classifier for Linear {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn n_classes(&self) -> usize {
            CLASS_COUNT
        }

        fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
            let turn = features[22].abs();
            let forward = features[33].abs() + features[34].abs();
            Ok(model::softmax(&[1.0, forward * 1e4, turn]))
        }

        fn name(&self) -> &str {
            "linear"
        }
    }

    #[test]
    fn test_full_pipeline() {
        let predictor =
            Predictor::new(ModelHandle::from_classifier(Linear), PipelineConfig::default()).unwrap();
        let window = SensorWindow::from_request(&mock_request(10, 500), predictor.config()).unwrap();

        let result = predictor.predict(&window).unwrap();
        let proba = result.probability.to_array();
        assert_relative_eq!(proba.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(proba.iter().all(|&p| p >= 0.0));
        assert_eq!(result.action, Action::from_index(result.prediction));
    }

    #[test]
    fn test_determinism() {
        let predictor =
            Predictor::new(ModelHandle::from_classifier(Linear), PipelineConfig::default()).unwrap();
        let body = mock_request(12, 250).to_string();

        let a = predictor.predict_json(&body).unwrap();
        let b = predictor.predict_json(&body).unwrap();
        assert_eq!(a, b);
    }
}
