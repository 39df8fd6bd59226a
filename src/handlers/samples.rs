//! Sample file handlers
//!
//! Bundled example JSONs, listed and downloadable pretty-printed. Purely
//! illustrative; not part of the prediction contract.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SampleList {
    pub samples: Vec<String>,
}

/// List bundled example JSON file names.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<SampleList>> {
    let mut samples = Vec::new();

    let mut entries = tokio::fs::read_dir(&state.config.samples_dir)
        .await
        .map_err(|e| AppError::NotFound(format!("Samples directory unavailable: {}", e)))?;

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".json") {
            samples.push(name);
        }
    }

    samples.sort();
    Ok(Json(SampleList { samples }))
}

/// Download one bundled example, pretty-printed, as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    // File names only, no path components.
    if name.contains('/') || name.contains('\\') || name.contains("..") || !name.ends_with(".json")
    {
        return Err(AppError::NotFound(format!("Unknown sample: {}", name)));
    }

    let path = std::path::Path::new(&state.config.samples_dir).join(&name);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound(format!("Unknown sample: {}", name)))?;

    // Bundled fixtures are valid by construction; a file that no longer
    // parses is a broken deployment, not a bad upload.
    let document: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!("Bundled sample '{}' is not valid JSON: {}", name, e);
        AppError::NotFound(format!("Sample unavailable: {}", name))
    })?;
    let pretty = serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::NotFound(format!("Sample unavailable: {} ({})", name, e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        pretty,
    ))
}
