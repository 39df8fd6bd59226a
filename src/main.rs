//! Spectral Susceptibility Predictor - Web Service
//!
//! Single-page form backed by a small JSON API: upload a spectral-feature
//! JSON document, validate it against the required column schema, and on
//! explicit predict action run the pre-trained Ertapenem S/R classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  SPECTRA-SR SERVICE                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │  Page +   │  │  Intake      │  │  ONNX Classifier  │  │
//! │  │  JSON API │  │  parse/      │  │  (loaded once,    │  │
//! │  │  (Axum)   │  │  flatten/    │  │   read-only)      │  │
//! │  │           │  │  validate    │  │                   │  │
//! │  └─────┬─────┘  └──────┬───────┘  └─────────┬─────────┘  │
//! │        └───────────────┴────────────────────┘            │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod flatten;
mod handlers;
mod model;
mod schema;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use model::{Classifier, OnnxClassifier};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spectra_sr=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Spectra-SR server starting...");
    tracing::info!("Model artifact: {}", config.model_path);
    tracing::info!(
        "Schema: {} required columns (layout hash {:08x})",
        schema::COLUMN_COUNT,
        schema::layout_hash()
    );

    // Load the classifier once; without it the service cannot run.
    let classifier = OnnxClassifier::load(&config.model_path)
        .expect("Failed to load classifier model");

    // Build application state
    let state = AppState {
        classifier: Arc::new(classifier),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::index::page))
        .route("/health", get(handlers::health::check))
        // Intake & prediction flow
        .route("/api/v1/upload", post(handlers::upload::upload))
        .route("/api/v1/predict", post(handlers::predict::predict))
        // Model introspection
        .route("/api/v1/model", get(handlers::model_status::status))
        .route("/api/v1/model/metadata", get(handlers::model_status::metadata))
        // Bundled examples
        .route("/api/v1/samples", get(handlers::samples::list))
        .route("/api/v1/samples/:name", get(handlers::samples::download))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
