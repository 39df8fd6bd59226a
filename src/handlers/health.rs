//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// The service is useless without its classifier; surface that here so
    /// probes don't need the full model endpoint.
    model_loaded: bool,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.classifier.status().model_loaded;
    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        model_loaded,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
