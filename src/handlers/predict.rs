//! Predict handler - the explicit trigger
//!
//! Runs the same intake pipeline as upload, then hands the full record to
//! the classifier. Re-posting the same bytes re-runs prediction; with a
//! deterministic model the displayed label never changes.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

use super::validated_record;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Short code rendered prominently by the page ("S" or "R").
    pub label: &'static str,
    pub class_name: &'static str,
}

pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictResponse>> {
    let record = validated_record(&body)?;

    let label = state
        .classifier
        .predict(&record)
        .map_err(|e| AppError::Prediction(e.to_string()))?;

    tracing::info!("Prediction: {}", label);

    Ok(Json(PredictResponse {
        label: label.code(),
        class_name: label.class_name(),
    }))
}
