//! Classifier adapter: from a window to a labelled prediction.
//!
//! [`Predictor`] owns the shared model handle and the pipeline config. It is
//! built once at startup, where the model is checked against the feature
//! schema, and is then safe to share across threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{ClassifierError, Result};
use crate::extractor::extract_features;
use crate::features::FeatureVector;
use crate::model::ModelHandle;
use crate::validation::validate_model_schema;
use crate::window::SensorWindow;

/// Number of movement classes the model distinguishes.
pub const CLASS_COUNT: usize = 3;

/// Semantic movement label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Standing still.
    Halt,
    /// Walking straight ahead.
    Forward,
    /// Changing heading.
    Turn,
    /// Class index outside the known set.
    Unknown,
}

impl Action {
    /// Map a class index to its label.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Halt,
            1 => Self::Forward,
            2 => Self::Turn,
            _ => Self::Unknown,
        }
    }

    /// Label as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Halt => "Halt",
            Self::Forward => "Forward",
            Self::Turn => "Turn",
            Self::Unknown => "Unknown",
        }
    }
}

/// Probability of each known class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    #[serde(rename = "Halt")]
    pub halt: f64,
    #[serde(rename = "Forward")]
    pub forward: f64,
    #[serde(rename = "Turn")]
    pub turn: f64,
}

impl ClassProbabilities {
    /// Probabilities in class-index order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; CLASS_COUNT] {
        [self.halt, self.forward, self.turn]
    }
}

/// Result of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Index of the most probable class.
    pub prediction: usize,
    /// Label of `prediction`.
    pub action: Action,
    /// Full distribution over the known classes.
    pub probability: ClassProbabilities,
}

/// Turn a class distribution into a prediction.
///
/// The distribution must have exactly [`CLASS_COUNT`] finite, non-negative
/// entries summing to 1 within `tolerance`. Ties go to the lowest index.
///
/// # Errors
///
/// Returns [`ClassifierError::InternalComputation`] if the distribution is
/// not a valid probability vector.
pub fn decide(probabilities: &[f64], tolerance: f64) -> Result<PredictionResult> {
    let proba: [f64; CLASS_COUNT] = probabilities.try_into().map_err(|_| {
        ClassifierError::internal(format!(
            "classifier returned {} probabilities, expected {CLASS_COUNT}",
            probabilities.len()
        ))
    })?;

    if proba.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ClassifierError::internal(format!(
            "classifier returned an invalid distribution {proba:?}"
        )));
    }
    let total: f64 = proba.iter().sum();
    if (total - 1.0).abs() > tolerance {
        return Err(ClassifierError::internal(format!(
            "classifier probabilities sum to {total}"
        )));
    }

    let mut prediction = 0;
    for (i, &p) in proba.iter().enumerate().skip(1) {
        if p > proba[prediction] {
            prediction = i;
        }
    }

    Ok(PredictionResult {
        prediction,
        action: Action::from_index(prediction),
        probability: ClassProbabilities {
            halt: proba[0],
            forward: proba[1],
            turn: proba[2],
        },
    })
}

/// Window-to-prediction service around a shared model.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: ModelHandle,
    config: PipelineConfig,
}

impl Predictor {
    /// Build a predictor, validating the config and the model schema.
    ///
    /// An unavailable model is accepted here; every call will then fail with
    /// [`ClassifierError::ModelUnavailable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a loaded model does not
    /// match the feature schema.
    pub fn new(model: ModelHandle, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        if let ModelHandle::Loaded(classifier) = &model {
            let report = validate_model_schema(classifier.as_ref())?;
            info!(
                model = classifier.name(),
                features = report.model_features,
                names_checked = report.names_checked,
                "model matches feature schema"
            );
        }
        Ok(Self { model, config })
    }

    /// Pipeline configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Shared model handle.
    #[must_use]
    pub const fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Score an already-extracted feature vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unavailable or its output is not a
    /// valid distribution.
    pub fn classify(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let model = self.model.get()?;
        let proba = model.predict_proba(features.as_slice())?;
        decide(&proba, self.config.probability_tolerance)
    }

    /// Extract features from a window and classify them.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ClassifierError::ModelUnavailable`] before any
    /// feature work if no model is loaded; otherwise any extraction or
    /// classification error.
    pub fn predict(&self, window: &SensorWindow) -> Result<PredictionResult> {
        self.model.get()?;
        let features = extract_features(window, &self.config)?;
        let result = self.classify(&features)?;
        debug!(
            samples = window.len(),
            prediction = result.prediction,
            action = result.action.as_str(),
            "classified window"
        );
        Ok(result)
    }

    /// Parse a raw request body and classify it.
    ///
    /// # Errors
    ///
    /// Fails fast with [`ClassifierError::ModelUnavailable`] regardless of
    /// the payload if no model is loaded; otherwise any ingestion,
    /// extraction or classification error.
    pub fn predict_json(&self, body: &str) -> Result<PredictionResult> {
        self.model.get()?;
        let window = SensorWindow::from_json_str(body, &self.config)?;
        self.predict(&window)
    }
}
