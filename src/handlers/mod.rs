//! HTTP handlers

pub mod health;
pub mod index;
pub mod model_status;
pub mod predict;
pub mod samples;
pub mod upload;

use crate::error::{AppError, AppResult};
use crate::flatten::{self, FeatureRecord};
use crate::schema;

/// Shared intake pipeline: parse -> flatten -> schema-validate.
///
/// Both the upload and predict handlers run this; prediction additionally
/// requires the explicit predict request, never happens on upload alone.
pub(crate) fn validated_record(bytes: &[u8]) -> AppResult<FeatureRecord> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;
    let record = flatten::flatten(&document)?;

    let missing = schema::missing_columns(record.column_names());
    if !missing.is_empty() {
        return Err(AppError::SchemaValidation { missing });
    }

    Ok(record)
}
