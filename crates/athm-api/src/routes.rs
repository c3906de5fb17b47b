//! # Routes
//!
//! Axum router configuration for the gateway.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - GET  /api/v1/operations - Operation catalogue
/// - GET  /api/v1/error-codes - Known provider error codes
/// - GET  /api/v1/error-codes/{code} - Describe one error code
/// - POST /api/v1/execute - Run an operation over a batch of items
/// - POST /api/v1/credentials/verify - Check the configured tokens
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Catalogue
        .route("/operations", get(handlers::list_operations))
        .route("/error-codes", get(handlers::list_error_codes))
        .route("/error-codes/{code}", get(handlers::get_error_code))
        // Execution
        .route("/execute", post(handlers::execute))
        .route("/credentials/verify", post(handlers::verify_credentials));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
