//! HTTP API Module
//! `GET /api/my-ip` plus the numeric tools, health and stats

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use middleware::{start_cleanup_task, RateLimitConfig, RateLimiter};
pub use routes::{create_router, create_router_with_timeout};
pub use types::*;
