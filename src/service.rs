//! Request/response boundary for the movement prediction endpoint.
//!
//! [`handle_predict_movement`] is transport-agnostic: it takes the raw
//! request body and returns a status code plus a JSON body, which any HTTP
//! layer can forward verbatim.

use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::{ClassifierError, ErrorKind};
use crate::predictor::Predictor;

/// Status and body of one response.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// JSON body: a prediction on success, `{"error": ...}` otherwise.
    pub body: Value,
}

impl ServiceResponse {
    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Error response for a failed call.
    #[must_use]
    pub fn from_error(err: &ClassifierError) -> Self {
        Self {
            status: err.kind().status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

/// Handle one prediction request body.
///
/// Never returns a prediction alongside an error: the body is either a
/// complete result or a single `error` field.
#[must_use]
pub fn handle_predict_movement(predictor: &Predictor, body: &str) -> ServiceResponse {
    let outcome = predictor.predict_json(body).and_then(|result| {
        serde_json::to_value(result).map_err(|e| ClassifierError::internal(e.to_string()))
    });

    match outcome {
        Ok(body) => ServiceResponse { status: 200, body },
        Err(err) => {
            match err.kind() {
                ErrorKind::BadInput => warn!(error = %err, "rejected prediction request"),
                ErrorKind::ModelUnavailable | ErrorKind::Internal => {
                    error!(error = %err, "prediction failed");
                }
            }
            ServiceResponse::from_error(&err)
        }
    }
}
