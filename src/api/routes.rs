//! API Routes
//!
//! Configures the Axum router with all metrics cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, get_config_handler, get_metrics_handler, health_handler,
    record_sample_handler, stats_handler, update_config_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /metrics/:namespace/:name` - Current usage and history for an entity
/// - `PUT /metrics/:namespace/:name` - Record a sample for an entity
/// - `DELETE /metrics` - Drop every cached entity
/// - `POST /metrics/cleanup` - Remove stale entities now
/// - `GET /config`, `PUT /config` - Read or change capacity and compaction interval
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/metrics/:namespace/:name",
            get(get_metrics_handler).put(record_sample_handler),
        )
        .route("/metrics", delete(clear_handler))
        .route("/metrics/cleanup", post(cleanup_handler))
        .route("/config", get(get_config_handler).put(update_config_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
