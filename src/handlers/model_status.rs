//! Model status handler

use axum::{extract::State, Json};

use crate::model::{ModelMetadata, ModelStatus};
use crate::AppState;

/// Engine status for the page footer: device, latency, inference count.
pub async fn status(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(state.classifier.status())
}

/// Load-time metadata: artifact path, schema version, layout hash.
pub async fn metadata(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.classifier.metadata())
}
