//! Single-page form

use axum::response::Html;

/// Serve the embedded upload/predict page.
pub async fn page() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
