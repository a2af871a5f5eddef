//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    count_handler, fetch_handler, health_handler, replay_handler, retrieve_handler,
    stats_handler, store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /store` - Store a payload under a fresh key
/// - `GET /retrieve/:key` - Retrieve a payload (`?as=raw|text|integer|float`)
/// - `GET /replay/:operation` - Recorded call history of an operation
/// - `GET /fetch?resource=` - Cached content of a resource
/// - `GET /count?resource=` - Upstream fetch count of a resource
/// - `GET /stats` - Store statistics
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
        .route("/store", post(store_handler))
        .route("/retrieve/:key", get(retrieve_handler))
        .route("/replay/:operation", get(replay_handler))
        .route("/fetch", get(fetch_handler))
        .route("/count", get(count_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
