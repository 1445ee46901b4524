//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, complete_draft_handler, get_draft_handler, health_handler,
    incomplete_drafts_handler, invalidate_key_handler, invalidate_pattern_handler,
    save_draft_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (the site front-end is served separately)
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/drafts", post(save_draft_handler))
        .route("/drafts/complete", post(complete_draft_handler))
        .route("/drafts/incomplete", get(incomplete_drafts_handler))
        .route("/drafts/:token", get(get_draft_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/invalidate", post(invalidate_pattern_handler))
        .route("/cache/:key", delete(invalidate_key_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
