//! Error handling
//!
//! Every per-request failure is converted into a user-visible JSON body at
//! the flow boundary; none terminate the process. Only the startup model
//! load is allowed to be fatal.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::flatten::FlattenError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Classifier artifact missing or corrupt. Fatal at startup.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// Upload body is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Valid JSON that does not flatten into a single row.
    #[error("normalization failed: {0}")]
    Normalization(#[from] FlattenError),

    /// Required feature columns absent from the uploaded record.
    #[error("missing required columns: {}", missing.join(", "))]
    SchemaValidation { missing: Vec<&'static str> },

    /// Classifier raised during inference.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Unknown resource (e.g. sample file name).
    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ModelLoad(msg) => {
                tracing::error!("Model load error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Classifier is not available".to_string(),
                )
            }
            AppError::InvalidJson(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid JSON file. Please upload a valid JSON file.".to_string(),
            ),
            AppError::Normalization(err) => {
                // Generic warning to the user, detail only in the log.
                tracing::warn!("Normalization error: {}", err);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Error in processing the file.".to_string(),
                )
            }
            AppError::SchemaValidation { missing } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "The uploaded JSON file does not contain all the required columns. Missing: {}",
                    missing.join(", ")
                ),
            ),
            AppError::Prediction(msg) => {
                // No stack traces or model internals reach the user.
                tracing::warn!("Prediction error: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Error in processing the file.".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidJson(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_validation_lists_missing_columns() {
        let err = AppError::SchemaValidation {
            missing: vec!["spectrum_bin_1", "spectrum_bin_2"],
        };
        assert_eq!(
            err.to_string(),
            "missing required columns: spectrum_bin_1, spectrum_bin_2"
        );
    }

    #[test]
    fn invalid_json_converts_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::InvalidJson(_)));
    }
}
