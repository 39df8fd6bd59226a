//! Upload handler - intake and validation only
//!
//! Prediction never happens here; the user must issue the explicit predict
//! action afterwards.

use axum::{body::Bytes, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::schema;

use super::validated_record;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub column_count: usize,
    pub required_count: usize,
    /// Column names of the normalized row, for the page's data preview.
    pub columns: Vec<String>,
}

/// Accept one raw JSON upload, normalize it and check the schema.
pub async fn upload(body: Bytes) -> AppResult<Json<UploadResponse>> {
    let record = validated_record(&body)?;

    tracing::info!(
        "Upload accepted: {} columns ({} required)",
        record.len(),
        schema::COLUMN_COUNT
    );

    Ok(Json(UploadResponse {
        message: "File successfully uploaded and processed!",
        column_count: record.len(),
        required_count: schema::COLUMN_COUNT,
        columns: record.column_names().map(str::to_string).collect(),
    }))
}
