//! Error types for movement classification.
//!
//! Every failure in the pipeline surfaces as a [`ClassifierError`]. Each
//! variant belongs to one [`ErrorKind`], which is what the request boundary
//! uses to pick a status code.

use thiserror::Error;

/// Main error type for ingestion, feature extraction and classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Request body is not valid JSON.
    #[error("Invalid JSON data provided: {0}")]
    InvalidJson(String),

    /// The `data` field is absent or not a list.
    #[error("Missing 'data' array in JSON payload")]
    MissingData,

    /// Window is too short for feature extraction.
    #[error("Insufficient samples: need at least {min}, got {actual}")]
    InsufficientSamples { min: usize, actual: usize },

    /// A sample record lacks a field or carries a value of the wrong type.
    #[error("Malformed sample at index {index}: field '{field}' {reason}")]
    MalformedSample {
        index: usize,
        field: String,
        reason: String,
    },

    /// The sampling interval is not a positive finite number.
    #[error("Invalid sampling interval: {0}")]
    InvalidInterval(String),

    /// No classifier is loaded.
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    /// The model artifact could not be read or parsed.
    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    /// The model does not match the feature schema.
    #[error("Model schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Numerical computation produced an unusable value.
    #[error("Internal computation error: {0}")]
    InternalComputation(String),
}

/// Coarse failure class of a [`ClassifierError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent something unusable.
    BadInput,
    /// The classifier artifact is not loaded.
    ModelUnavailable,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// HTTP-style status code for this class.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadInput => 400,
            Self::ModelUnavailable => 503,
            Self::Internal => 500,
        }
    }
}

/// Result type alias for classifier operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    /// Classify this error for the request boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidJson(_)
            | Self::MissingData
            | Self::InsufficientSamples { .. }
            | Self::MalformedSample { .. }
            | Self::InvalidInterval(_) => ErrorKind::BadInput,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::ModelLoad(_)
            | Self::SchemaMismatch(_)
            | Self::InvalidConfig(_)
            | Self::InternalComputation(_) => ErrorKind::Internal,
        }
    }

    /// Create an insufficient samples error.
    #[must_use]
    pub const fn insufficient_samples(min: usize, actual: usize) -> Self {
        Self::InsufficientSamples { min, actual }
    }

    /// Create a malformed sample error.
    #[must_use]
    pub fn malformed_sample(index: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSample {
            index,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid interval error.
    #[must_use]
    pub fn invalid_interval(msg: impl Into<String>) -> Self {
        Self::InvalidInterval(msg.into())
    }

    /// Create a model unavailable error.
    #[must_use]
    pub fn model_unavailable(reason: impl Into<String>) -> Self {
        Self::ModelUnavailable(reason.into())
    }

    /// Create a model load error.
    #[must_use]
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an internal computation error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalComputation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassifierError::insufficient_samples(2, 1);
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('1'));

        let err = ClassifierError::malformed_sample(3, "gps_lat", "is missing");
        let msg = err.to_string();
        assert!(msg.contains("gps_lat"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ClassifierError::MissingData.kind(), ErrorKind::BadInput);
        assert_eq!(
            ClassifierError::insufficient_samples(3, 2).kind(),
            ErrorKind::BadInput
        );
        assert_eq!(
            ClassifierError::model_unavailable("missing file").kind(),
            ErrorKind::ModelUnavailable
        );
        assert_eq!(
            ClassifierError::internal("nan").kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            ClassifierError::schema_mismatch("arity").kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::BadInput.status_code(), 400);
        assert_eq!(ErrorKind::ModelUnavailable.status_code(), 503);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }
}
