//! Startup checks between the feature schema and a loaded model.
//!
//! The model scores features by position, so a mismatch would not raise
//! any numeric error at inference time. These checks run once, when the
//! [`Predictor`](crate::Predictor) is built.

use crate::error::{ClassifierError, Result};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
use crate::model::Classifier;
use crate::predictor::CLASS_COUNT;

/// Outcome of a schema comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// Input arity the model expects.
    pub model_features: usize,

    /// Output classes the model produces.
    pub model_classes: usize,

    /// Whether the artifact carried feature names to compare.
    pub names_checked: bool,
}

/// Check a model against the feature schema.
///
/// Verifies arity and class count, and, when the artifact stores feature
/// names, that they match the schema position by position.
///
/// # Errors
///
/// Returns [`ClassifierError::SchemaMismatch`] describing the first
/// disagreement.
pub fn validate_model_schema(model: &dyn Classifier) -> Result<SchemaReport> {
    let model_features = model.n_features();
    if model_features != FEATURE_COUNT {
        return Err(ClassifierError::schema_mismatch(format!(
            "model expects {model_features} features, pipeline produces {FEATURE_COUNT}"
        )));
    }

    let model_classes = model.n_classes();
    if model_classes != CLASS_COUNT {
        return Err(ClassifierError::schema_mismatch(format!(
            "model has {model_classes} classes, expected {CLASS_COUNT}"
        )));
    }

    let names_checked = match model.feature_names() {
        Some(names) => {
            if names.len() != FEATURE_COUNT {
                return Err(ClassifierError::schema_mismatch(format!(
                    "model lists {} feature names, expected {FEATURE_COUNT}",
                    names.len()
                )));
            }
            if let Some((i, (got, want))) = names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .enumerate()
                .find(|(_, (got, want))| got.as_str() != **want)
            {
                return Err(ClassifierError::schema_mismatch(format!(
                    "feature {i} is '{got}' in the model, '{want}' in the pipeline"
                )));
            }
            true
        }
        None => false,
    };

    Ok(SchemaReport {
        model_features,
        model_classes,
        names_checked,
    })
}
