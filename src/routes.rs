use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::translate::TRANSLATION_SERVICES;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        .route("/api/test-cors", get(test_cors))

        // Translation
        .route("/api/services", get(get_services))
        .route("/api/translate", post(handlers::translate))

        // Image pair labeling
        .route("/api/kontext/label", post(handlers::label_images))
}

/// Full application: routes, body limit, CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn test_cors() -> Json<Value> {
    Json(json!({ "message": "CORS is working correctly!" }))
}

async fn get_services() -> Json<Value> {
    Json(json!({ "services": TRANSLATION_SERVICES }))
}
