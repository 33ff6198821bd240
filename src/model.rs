//! Pretrained classifier artifacts.
//!
//! The pipeline talks to models through the [`Classifier`] trait, so tests
//! and alternative back ends can be injected freely. The shipped back end is
//! [`GbdtModel`], a gradient-boosted tree ensemble read from a LightGBM
//! `dump_model()` JSON file.
//!
//! Models are loaded once at startup into a [`ModelHandle`]. A load failure
//! does not abort the process; the handle records the reason and every
//! prediction then fails fast with [`ClassifierError::ModelUnavailable`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::{ClassifierError, Result};

/// A fitted multi-class probabilistic classifier.
pub trait Classifier: Send + Sync {
    /// Number of input features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Number of output classes.
    fn n_classes(&self) -> usize;

    /// Feature names stored in the artifact, if any.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Per-class probabilities for one feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row has the wrong length or scoring fails.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Model name for logging.
    fn name(&self) -> &str;
}

/// Process-wide model state, fixed at startup.
#[derive(Clone)]
pub enum ModelHandle {
    /// A usable model shared read-only by every call.
    Loaded(Arc<dyn Classifier>),
    /// Loading failed; the reason is reported on every call.
    Unavailable(String),
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(model) => f.debug_tuple("Loaded").field(&model.name()).finish(),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl ModelHandle {
    /// Wrap an in-memory classifier.
    #[must_use]
    pub fn from_classifier<C: Classifier + 'static>(classifier: C) -> Self {
        Self::Loaded(Arc::new(classifier))
    }

    /// The loaded model, or a fail-fast error.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::ModelUnavailable`] if loading failed.
    pub fn get(&self) -> Result<&Arc<dyn Classifier>> {
        match self {
            Self::Loaded(model) => Ok(model),
            Self::Unavailable(reason) => Err(ClassifierError::model_unavailable(reason.clone())),
        }
    }

    /// Whether a model is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Load a model from disk, recording failure instead of returning it.
#[must_use]
pub fn load_model(path: &Path) -> ModelHandle {
    match GbdtModel::from_file(path) {
        Ok(model) => {
            info!(
                path = %path.display(),
                trees = model.trees.len(),
                classes = model.num_class,
                features = model.n_features,
                "loaded model"
            );
            ModelHandle::from_classifier(model)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "model not loaded");
            ModelHandle::Unavailable(e.to_string())
        }
    }
}

// ============================================================================
// LightGBM model dump
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawDump {
    num_class: usize,
    #[serde(default)]
    num_tree_per_iteration: Option<usize>,
    max_feature_idx: usize,
    #[serde(default)]
    objective: Option<String>,
    #[serde(default)]
    average_output: bool,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    tree_info: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    #[serde(default)]
    tree_index: Option<usize>,
    tree_structure: TreeNode,
}

/// What a split does with missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MissingType {
    /// NaN is treated as zero.
    #[default]
    None,
    /// Zero (and NaN) follow the default direction.
    Zero,
    /// NaN follows the default direction.
    NaN,
}

/// One node of a decision tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Internal node with a numerical threshold.
    Split {
        split_feature: usize,
        threshold: f64,
        #[serde(default = "default_decision_type")]
        decision_type: String,
        #[serde(default)]
        default_left: bool,
        #[serde(default)]
        missing_type: MissingType,
        left_child: Box<TreeNode>,
        right_child: Box<TreeNode>,
    },
    /// Terminal node.
    Leaf { leaf_value: f64 },
}

fn default_decision_type() -> String {
    "<=".to_string()
}

const ZERO_THRESHOLD: f64 = 1e-35;

impl TreeNode {
    /// Walk the tree for one feature row and return the leaf value.
    ///
    /// # Errors
    ///
    /// Returns an error if a split reads a feature past the end of the row.
    pub fn evaluate(&self, features: &[f64]) -> Result<f64> {
        let mut node = self;
        loop {
            match node {
                Self::Leaf { leaf_value } => return Ok(*leaf_value),
                Self::Split {
                    split_feature,
                    threshold,
                    default_left,
                    missing_type,
                    left_child,
                    right_child,
                    ..
                } => {
                    let mut value = *features.get(*split_feature).ok_or_else(|| {
                        ClassifierError::internal(format!(
                            "split on feature {split_feature}, row has {}",
                            features.len()
                        ))
                    })?;
                    let is_missing = match missing_type {
                        MissingType::NaN => value.is_nan(),
                        MissingType::Zero => value.is_nan() || value.abs() <= ZERO_THRESHOLD,
                        MissingType::None => {
                            if value.is_nan() {
                                value = 0.0;
                            }
                            false
                        }
                    };
                    let go_left = if is_missing {
                        *default_left
                    } else {
                        value <= *threshold
                    };
                    node = if go_left { left_child } else { right_child };
                }
            }
        }
    }

    fn check(&self, n_features: usize) -> Result<()> {
        match self {
            Self::Leaf { leaf_value } if leaf_value.is_finite() => Ok(()),
            Self::Leaf { .. } => Err(ClassifierError::model_load("non-finite leaf value")),
            Self::Split {
                split_feature,
                decision_type,
                left_child,
                right_child,
                ..
            } => {
                if decision_type != "<=" {
                    return Err(ClassifierError::model_load(format!(
                        "unsupported decision type '{decision_type}'"
                    )));
                }
                if *split_feature >= n_features {
                    return Err(ClassifierError::model_load(format!(
                        "split on feature {split_feature}, model has {n_features}"
                    )));
                }
                left_child.check(n_features)?;
                right_child.check(n_features)
            }
        }
    }
}

/// Gradient-boosted tree ensemble with softmax output.
#[derive(Debug, Clone)]
pub struct GbdtModel {
    num_class: usize,
    trees_per_iteration: usize,
    n_features: usize,
    average_output: bool,
    feature_names: Option<Vec<String>>,
    trees: Vec<TreeNode>,
}

impl GbdtModel {
    /// Read a LightGBM JSON model dump from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::ModelLoad`] if the file cannot be read or
    /// is not a supported model.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClassifierError::model_load(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    /// Parse a LightGBM JSON model dump.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::ModelLoad`] for malformed JSON, a
    /// non-softmax objective, categorical splits, or inconsistent tree
    /// counts.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawDump =
            serde_json::from_str(content).map_err(|e| ClassifierError::model_load(e.to_string()))?;

        if raw.num_class < 2 {
            return Err(ClassifierError::model_load(format!(
                "expected a multi-class model, got num_class = {}",
                raw.num_class
            )));
        }
        if let Some(objective) = &raw.objective {
            let name = objective.split_whitespace().next().unwrap_or_default();
            if name != "multiclass" && name != "softmax" {
                return Err(ClassifierError::model_load(format!(
                    "unsupported objective '{objective}'"
                )));
            }
        }

        let trees_per_iteration = raw.num_tree_per_iteration.unwrap_or(raw.num_class);
        if trees_per_iteration != raw.num_class {
            return Err(ClassifierError::model_load(format!(
                "{trees_per_iteration} trees per iteration for {} classes",
                raw.num_class
            )));
        }
        if raw.tree_info.is_empty() || raw.tree_info.len() % trees_per_iteration != 0 {
            return Err(ClassifierError::model_load(format!(
                "{} trees is not a whole number of iterations",
                raw.tree_info.len()
            )));
        }

        let n_features = raw.max_feature_idx + 1;
        if let Some(names) = &raw.feature_names {
            if names.len() != n_features {
                return Err(ClassifierError::model_load(format!(
                    "{} feature names for {n_features} features",
                    names.len()
                )));
            }
        }

        let mut trees = Vec::with_capacity(raw.tree_info.len());
        for (position, tree) in raw.tree_info.into_iter().enumerate() {
            if let Some(index) = tree.tree_index {
                if index != position {
                    return Err(ClassifierError::model_load(format!(
                        "tree {position} is labelled {index}"
                    )));
                }
            }
            tree.tree_structure.check(n_features)?;
            trees.push(tree.tree_structure);
        }

        Ok(Self {
            num_class: raw.num_class,
            trees_per_iteration,
            n_features,
            average_output: raw.average_output,
            feature_names: raw.feature_names,
            trees,
        })
    }

    /// Raw (pre-softmax) score per class.
    ///
    /// # Errors
    ///
    /// Returns an error if the row has the wrong length.
    pub fn raw_scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(ClassifierError::internal(format!(
                "model expects {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let mut scores = vec![0.0; self.num_class];
        for (i, tree) in self.trees.iter().enumerate() {
            scores[i % self.trees_per_iteration] += tree.evaluate(features)?;
        }
        if self.average_output {
            let iterations = (self.trees.len() / self.trees_per_iteration) as f64;
            for s in &mut scores {
                *s /= iterations;
            }
        }
        Ok(scores)
    }
}

/// Numerically stable softmax.
#[must_use]
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.iter().map(|e| e / total).collect()
}

impl Classifier for GbdtModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.num_class
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        Ok(softmax(&self.raw_scores(features)?))
    }

    fn name(&self) -> &str {
        "lightgbm-gbdt"
    }
}
