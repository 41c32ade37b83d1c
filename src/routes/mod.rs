// src/routes/mod.rs
pub mod products;

use std::path::Path;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::state::AppState;

/// Entry page of the browser form.
const INDEX_PAGE: &str = "/index.html";

/// API under `/api`, the browser form served from `static_dir`, CORS open to everyone.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let api = Router::new().merge(products::routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .route("/", get(redirect_to_index))
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// 302 Found
async fn redirect_to_index() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, INDEX_PAGE)])
}

async fn health_check() -> &'static str {
    "OK"
}
