//! API Routes
//!
//! Configures the Axum router with all viewer endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    close_handler, health_handler, invalidate_handler, open_handler, page_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /documents/open` - Open a document and list its sheets
/// - `POST /documents/page` - Fetch one page of a sheet
/// - `POST /documents/invalidate` - Drop cached data for a document and reload it
/// - `POST /documents/close` - Close a document and stop watching it
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/documents/open", post(open_handler))
        .route("/documents/page", post(page_handler))
        .route("/documents/invalidate", post(invalidate_handler))
        .route("/documents/close", post(close_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
