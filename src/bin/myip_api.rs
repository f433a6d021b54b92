//! MyIP Toolkit API Server
//!
//! REST API for network-identity lookups and utility calculators
//!
//! Usage:
//!   cargo run --bin myip_api
//!
//! Environment:
//!   PORT / MYIP_PORT          - Server port (default: 8080)
//!   MYIP_HOST                 - Server host (default: 0.0.0.0)
//!   MYIP_RATE_LIMIT_PER_MIN   - Requests per client per minute (default: 100)
//!   MYIP_REQUEST_TIMEOUT_SECS - Per-request timeout (default: 30)
//!   MYIP_TRUST_PROXY          - Rate-limit by X-Forwarded-For (default: false)
//!   DBIP_API_KEY              - db-ip.com key (default: free)
//!   RUST_LOG                  - Log filter (default: info)

use myip_toolkit::api::{create_router_with_timeout, start_cleanup_task, AppState, RateLimitConfig};
use myip_toolkit::{IdentityPipeline, LookupConfig, ServerConfig, TelemetryCollector};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let server_config = ServerConfig::from_env()?;
    let lookup_config = LookupConfig::from_env();

    // Initialize telemetry
    let telemetry = Arc::new(TelemetryCollector::new());
    let telemetry_for_shutdown = telemetry.clone();

    let pipeline = Arc::new(IdentityPipeline::new(lookup_config, telemetry)?);
    for provider in pipeline.pool().providers() {
        info!("🌐 Provider {} ({}ms)", provider.label, provider.timeout_ms);
    }

    // Create app state
    let state = Arc::new(AppState::new(
        pipeline,
        RateLimitConfig::per_minute(server_config.rate_limit_per_min)
            .trusting_forwarded_headers(server_config.trust_proxy),
    ));
    if !server_config.trust_proxy {
        info!("🔒 Rate limiting by peer address (set MYIP_TRUST_PROXY=true behind a proxy)");
    }

    // Start background cleanup task for rate limiter
    start_cleanup_task(state.rate_limiter.clone());
    info!("🧹 Background cleanup task started");

    let app = create_router_with_timeout(state, server_config.request_timeout);
    let addr = server_config.socket_addr()?;

    info!("🚀 MyIP Toolkit API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /api/my-ip                     - Caller identity, location and risk flags");
    info!("  POST /v1/tools/loan                 - Loan EMI");
    info!("  POST /v1/tools/password/strength    - Password strength");
    info!("  POST /v1/tools/password/generate    - Password generator");
    info!("  POST /v1/tools/convert/unit         - Unit conversion");
    info!("  POST /v1/tools/gpa                  - GPA calculator");
    info!("  POST /v1/tools/color                - Color conversion");
    info!("  GET  /v1/stats                      - Lookup statistics");
    info!("  GET  /v1/health                     - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
        }
    };

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("🛑 Shutdown signal received, cleaning up...");

    info!("📊 Exporting final telemetry...");
    let stats = telemetry_for_shutdown.get_stats();
    info!("   Total lookups: {}", stats.total_lookups);
    info!("   Fallback lookups: {}", stats.fallback_lookups);
    info!("   Flagged lookups: {}", stats.flagged_lookups);

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 MyIP Toolkit API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    +--------------------------------------------------+
    |                                                  |
    |          M Y I P   T O O L K I T   A P I         |
    |                                                  |
    |     identity lookup  /  risk flags  /  tools     |
    |                     v{:<8}                    |
    +--------------------------------------------------+
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
