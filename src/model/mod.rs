//! Model Module - Classifier Capability
//!
//! The flow only needs `predict(record) -> label`; everything about the
//! concrete model format lives behind [`Classifier`] so the artifact can be
//! swapped (tree ensemble, linear model, ...) without touching the handlers.

pub mod onnx;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flatten::FeatureRecord;

pub use onnx::OnnxClassifier;

/// Predicted susceptibility class. Closed set, encoded as short codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Susceptible,
    Resistant,
}

/// Class decoding order for integer model outputs.
/// sklearn's LabelEncoder sorts labels alphabetically: "R" < "S".
pub const CLASS_LABELS: [Label; 2] = [Label::Resistant, Label::Susceptible];

impl Label {
    /// Short code shown to the user.
    pub fn code(&self) -> &'static str {
        match self {
            Label::Susceptible => "S",
            Label::Resistant => "R",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Label::Susceptible => "Susceptible",
            Label::Resistant => "Resistant",
        }
    }

    /// Parse a model-emitted label string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" | "s" | "Susceptible" | "susceptible" => Some(Label::Susceptible),
            "R" | "r" | "Resistant" | "resistant" => Some(Label::Resistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Inference-time failure inside a classifier implementation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

/// Model metadata, fixed at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub feature_count: usize,
    pub schema_version: u8,
    pub layout_hash: u32,
    pub loaded_at: DateTime<Utc>,
}

/// Engine status for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

/// The one capability the intake flow needs from a trained model.
///
/// Implementations must be side-effect-free per call: the loaded model is
/// shared read-only across concurrent requests without outer locking.
pub trait Classifier: Send + Sync {
    /// Classify a single validated record. The record carries all uploaded
    /// columns; implementations select the ones they were trained on.
    fn predict(&self, record: &FeatureRecord) -> Result<Label, InferenceError>;

    fn metadata(&self) -> ModelMetadata;

    fn status(&self) -> ModelStatus;
}
