//! ONNX Runtime classifier
//!
//! Loads the exported susceptibility model once and runs single-row
//! inference. Kept behind the [`Classifier`] trait so the flow never sees
//! ort types.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::flatten::FeatureRecord;
use crate::schema::{self, ALL_COLUMNS, COLUMN_COUNT};

use super::{Classifier, InferenceError, Label, ModelMetadata, ModelStatus, CLASS_LABELS};

/// Pre-trained ONNX classifier, loaded once per process.
///
/// `Session::run` needs `&mut`, so the session sits behind a mutex; the
/// model itself is never mutated after load.
#[derive(Debug)]
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl OnnxClassifier {
    /// Load the model artifact from disk. Any failure here is treated as
    /// fatal by the caller: the service cannot run without a classifier.
    pub fn load(model_path: &str) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", model_path);

        if !Path::new(model_path).exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path)));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError("Model has no output defined".to_string()))?;

        tracing::info!("ONNX model loaded successfully");

        let metadata = ModelMetadata {
            model_path: model_path.to_string(),
            model_type: "logistic_regression".to_string(),
            feature_count: COLUMN_COUNT,
            schema_version: schema::SCHEMA_VERSION,
            layout_hash: schema::layout_hash(),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Build the (1, COLUMN_COUNT) input tensor in schema order.
    /// Extra uploaded columns are simply never read here.
    fn input_array(record: &FeatureRecord) -> Result<Array2<f32>, InferenceError> {
        let mut values = Vec::with_capacity(COLUMN_COUNT);
        for name in ALL_COLUMNS {
            let value = record.numeric(name).ok_or_else(|| {
                InferenceError(format!("column '{}' is missing or not numeric", name))
            })?;
            values.push(value);
        }

        Array2::from_shape_vec((1, COLUMN_COUNT), values)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))
    }

    fn decode_label(&self, output: &Value) -> Result<Label, InferenceError> {
        // Exported sklearn models emit int64 class ids; class order follows
        // LabelEncoder's alphabetical sort (R = 0, S = 1).
        if let Ok((_, ids)) = output.try_extract_tensor::<i64>() {
            let id = *ids
                .first()
                .ok_or_else(|| InferenceError("Empty label output".to_string()))?;
            return CLASS_LABELS
                .get(id as usize)
                .copied()
                .ok_or_else(|| InferenceError(format!("Unknown class id: {}", id)));
        }

        // Score-tensor fallback: argmax over the same class order.
        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        match scores.len() {
            0 => Err(InferenceError("Empty score output".to_string())),
            1 => {
                // Single probability of the positive (alphabetically last) class.
                if scores[0] >= 0.5 {
                    Ok(CLASS_LABELS[1])
                } else {
                    Ok(CLASS_LABELS[0])
                }
            }
            _ => {
                let mut best = 0usize;
                for (i, score) in scores.iter().enumerate() {
                    if *score > scores[best] {
                        best = i;
                    }
                }
                CLASS_LABELS
                    .get(best)
                    .copied()
                    .ok_or_else(|| InferenceError(format!("Unknown class index: {}", best)))
            }
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, record: &FeatureRecord) -> Result<Label, InferenceError> {
        let start_time = std::time::Instant::now();

        let input_array = Self::input_array(record)?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let label = {
            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![input_tensor])
                .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

            let output = outputs
                .get(&self.output_name)
                .ok_or_else(|| InferenceError("No output".to_string()))?;

            self.decode_label(output)?
        };

        let elapsed_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!("Inference complete: {} ({} us)", label, elapsed_us);

        Ok(label)
    }

    fn metadata(&self) -> ModelMetadata {
        self.metadata.clone()
    }

    fn status(&self) -> ModelStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f32 / count as f32) / 1000.0
        } else {
            0.0
        };

        ModelStatus {
            model_loaded: true,
            model_name: self.metadata.model_path.clone(),
            inference_device: "ONNX Runtime (CPU)".to_string(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> FeatureRecord {
        let mut doc = serde_json::Map::new();
        for (i, name) in ALL_COLUMNS.iter().enumerate() {
            doc.insert(name.to_string(), json!(i as f64 * 0.1));
        }
        crate::flatten::flatten(&serde_json::Value::Object(doc)).unwrap()
    }

    #[test]
    fn input_array_follows_schema_order() {
        let record = full_record();
        let array = OnnxClassifier::input_array(&record).unwrap();

        assert_eq!(array.shape(), &[1, COLUMN_COUNT]);
        assert!((array[[0, 0]] - 0.0).abs() < 1e-6);
        assert!((array[[0, COLUMN_COUNT - 1]] - 0.1 * (COLUMN_COUNT - 1) as f32).abs() < 1e-4);
    }

    #[test]
    fn input_array_rejects_non_numeric_column() {
        let mut doc = serde_json::Map::new();
        for name in ALL_COLUMNS {
            doc.insert(name.to_string(), json!(1.0));
        }
        doc.insert("spectrum_bin_5".to_string(), json!("not a number"));
        let record = crate::flatten::flatten(&serde_json::Value::Object(doc)).unwrap();

        let err = OnnxClassifier::input_array(&record).unwrap_err();
        assert!(err.0.contains("spectrum_bin_5"));
    }

    #[test]
    fn load_missing_artifact_fails() {
        let err = OnnxClassifier::load("/nonexistent/model.onnx").unwrap_err();
        assert!(err.0.contains("Model not found"));
    }
}
