//! Identity Pipeline
//!
//! Runs Extractor → Resolver Pool → Normalizer → Classifier for one request.
//! Every stage is sequential and side-effect free apart from telemetry.

use axum::http::HeaderMap;
use eyre::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::core::classifier;
use crate::core::extractor;
use crate::models::config::LookupConfig;
use crate::models::types::IdentityReport;
use crate::providers::echo::EchoClient;
use crate::providers::geo::{AttemptStatus, ResolveOutcome, ResolverPool};
use crate::utils::telemetry::{LookupEvent, TelemetryCollector};

/// Report plus the bookkeeping the caller may want to log
#[derive(Debug, Clone)]
pub struct LookupResult {
    pub report: IdentityReport,
    /// Address the providers were asked about
    pub candidate: String,
    pub outcome: ResolveOutcome,
}

pub struct IdentityPipeline {
    pool: ResolverPool,
    echo: EchoClient,
    telemetry: Arc<TelemetryCollector>,
}

impl IdentityPipeline {
    pub fn new(config: LookupConfig, telemetry: Arc<TelemetryCollector>) -> Result<Self> {
        let client = ResolverPool::build_client()?;
        Ok(Self::with_client(client, config, telemetry))
    }

    pub fn with_client(
        client: reqwest::Client,
        config: LookupConfig,
        telemetry: Arc<TelemetryCollector>,
    ) -> Self {
        Self {
            pool: ResolverPool::new(client.clone(), config.providers),
            echo: EchoClient::new(client, config.echo_services),
            telemetry,
        }
    }

    pub fn pool(&self) -> &ResolverPool {
        &self.pool
    }

    pub fn telemetry(&self) -> &Arc<TelemetryCollector> {
        &self.telemetry
    }

    /// Full lookup for an inbound request
    pub async fn lookup_headers(&self, headers: &HeaderMap) -> LookupResult {
        let extracted = extractor::extract_candidate(headers);
        self.lookup(extracted).await
    }

    /// Full lookup for an already extracted candidate (echo fallback included)
    pub async fn lookup(&self, extracted: String) -> LookupResult {
        let start = Instant::now();

        let candidate = extractor::resolve_public_candidate(extracted.clone(), &self.echo).await;
        let echo_replaced = candidate != extracted;

        let outcome = self.pool.resolve(&candidate).await;
        let flags = classifier::classify(&outcome.record, &candidate);
        let report = IdentityReport::new(outcome.record.clone(), flags);

        let latency_ms = start.elapsed().as_millis() as u64;
        let skipped_attempts = outcome
            .attempts
            .iter()
            .filter(|a| matches!(a.status, AttemptStatus::Skipped(_)))
            .count() as u64;

        self.telemetry.record_lookup(LookupEvent {
            provider: outcome.provider.as_deref(),
            skipped_attempts,
            echo_replaced,
            flags,
            latency_ms,
        });

        info!(
            "🔍 {} via {} in {}ms",
            report.summary(),
            outcome.provider.as_deref().unwrap_or("fallback"),
            latency_ms
        );

        LookupResult {
            report,
            candidate,
            outcome,
        }
    }
}
