//! MyIP Toolkit CLI
//!
//! One-shot identity lookup:
//!
//!   myip_toolkit            # look up this machine's public address
//!   myip_toolkit 8.8.8.8    # look up a specific address
//!
//! Prints the identity report as pretty JSON on stdout. Logs go to stderr.

use myip_toolkit::{IdentityPipeline, LookupConfig, TelemetryCollector, LOOPBACK_FALLBACK};

use eyre::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // A missing address goes through the echo fallback, like a local caller
    let address = std::env::args()
        .nth(1)
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| LOOPBACK_FALLBACK.to_string());

    let telemetry = Arc::new(TelemetryCollector::new());
    let pipeline = IdentityPipeline::new(LookupConfig::from_env(), telemetry)?;

    let result = pipeline.lookup(address).await;
    info!(
        "Resolved {} after {} provider attempt(s)",
        result.candidate,
        result.outcome.attempts.len()
    );

    println!("{}", serde_json::to_string_pretty(&result.report)?);

    Ok(())
}
