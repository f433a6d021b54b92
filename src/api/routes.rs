//! API Route Configuration

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{logging_middleware, rate_limit_middleware};
use crate::utils::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CONCURRENT_REQUESTS};

/// Create the API router with the default request timeout
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_timeout(state, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
}

/// Create the API router with all routes and middleware
pub fn create_router_with_timeout(state: Arc<AppState>, request_timeout: Duration) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health & Status
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        // Tools
        .route("/tools/loan", post(handlers::loan_calculator))
        .route("/tools/password/strength", post(handlers::password_strength))
        .route("/tools/password/generate", post(handlers::password_generate))
        .route("/tools/convert/unit", post(handlers::convert_unit))
        .route("/tools/gpa", post(handlers::gpa_calculator))
        .route("/tools/color", post(handlers::color_converter));

    // Back-pressure: shed load instead of queueing without bound
    let concurrency = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: BoxError| async {
            StatusCode::SERVICE_UNAVAILABLE
        }))
        .load_shed()
        .concurrency_limit(MAX_CONCURRENT_REQUESTS);

    // Build full router
    Router::new()
        .route("/api/my-ip", get(handlers::my_ip))
        .nest("/v1", api_v1)
        // Also expose at root for convenience
        .route("/health", get(handlers::health_check))
        // Middleware (order matters - bottom runs first)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(concurrency)
        .layer(middleware::from_fn(logging_middleware))
}
