//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the serialized classifier artifact
    pub model_path: String,

    /// Server port
    pub port: u16,

    /// Directory of bundled example JSON files
    pub samples_dir: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "model/ertapenem_lr.onnx".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            samples_dir: env::var("SAMPLES_DIR").unwrap_or_else(|_| "samples".to_string()),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
