//! HTTP routes.

pub mod api;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/lazy_rag", post(api::lazy_rag))
        .route("/naive_rag", post(api::naive_rag))
        .route("/api/rebuild", post(api::rebuild))
        .route("/api/reload", post(api::reload))
        .route("/api/stats", get(api::get_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
