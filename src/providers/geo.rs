//! Upstream Resolver Pool - Multi-Provider Geolocation
//!
//! Queries a fixed, ordered list of geolocation providers one at a time:
//! 1. Each provider gets exactly one attempt with its own timeout
//! 2. HTTP 429 and any other failure skip to the next provider
//! 3. The first payload whose normalized country is known is accepted
//! 4. Exhaustion yields the all-"Unknown" fallback record
//!
//! No retries, no backoff, no parallel fan-out: an earlier provider
//! always wins over a later one.

use eyre::{eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::net::IpAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::normalizer::{self, RawProviderResponse};
use crate::models::config::ProviderDescriptor;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::NormalizedIdentityRecord;
use crate::utils::constants::{ECHO_TIMEOUT_MS, USER_AGENT as USER_AGENT_CONST};

/// What happened to one provider during a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Normalized record had a known country; loop stopped here
    Accepted,
    /// Payload was usable but the country stayed "Unknown"
    NoCountry,
    /// Provider failed or was unusable
    Skipped(ErrorCode),
}

#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub label: String,
    pub status: AttemptStatus,
    pub latency_ms: u64,
}

/// Result of running the pool for one candidate
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub record: NormalizedIdentityRecord,
    /// Label of the accepting provider; `None` means fallback
    pub provider: Option<String>,
    pub attempts: Vec<ProviderAttempt>,
}

impl ResolveOutcome {
    pub fn is_fallback(&self) -> bool {
        self.provider.is_none()
    }
}

/// Sequential provider pool
#[derive(Clone)]
pub struct ResolverPool {
    client: reqwest::Client,
    providers: Vec<ProviderDescriptor>,
}

impl ResolverPool {
    pub fn new(client: reqwest::Client, providers: Vec<ProviderDescriptor>) -> Self {
        Self { client, providers }
    }

    /// Build the shared HTTP client (gzip, JSON accept, fixed User-Agent).
    /// Per-call budgets come from each descriptor; the client-wide timeout
    /// only backstops them.
    pub fn build_client() -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(ECHO_TIMEOUT_MS * 2))
            .gzip(true)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
    }

    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Try providers in order until one yields a known country.
    /// A candidate that is not an IP address never reaches a provider.
    pub async fn resolve(&self, candidate: &str) -> ResolveOutcome {
        let address = match candidate.trim().parse::<IpAddr>() {
            Ok(address) => address,
            Err(_) => {
                warn!("🚫 Candidate {:?} is not an IP address, using fallback record", candidate);
                return ResolveOutcome {
                    record: NormalizedIdentityRecord::fallback(candidate),
                    provider: None,
                    attempts: Vec::new(),
                };
            }
        };

        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let start = Instant::now();
            let result = self.fetch(provider, address).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("⚠️ Provider skipped: {} ({}ms)", e, latency_ms);
                    attempts.push(ProviderAttempt {
                        label: provider.label.clone(),
                        status: AttemptStatus::Skipped(e.code),
                        latency_ms,
                    });
                    continue;
                }
            };

            let record = normalizer::normalize(&raw, candidate);
            if record.location.has_country() {
                info!(
                    "✅ {} resolved {} → {} ({}ms)",
                    provider.label, candidate, record.location.country, latency_ms
                );
                attempts.push(ProviderAttempt {
                    label: provider.label.clone(),
                    status: AttemptStatus::Accepted,
                    latency_ms,
                });
                return ResolveOutcome {
                    record,
                    provider: Some(provider.label.clone()),
                    attempts,
                };
            }

            debug!("🔄 {} returned no country for {}, trying next", provider.label, candidate);
            attempts.push(ProviderAttempt {
                label: provider.label.clone(),
                status: AttemptStatus::NoCountry,
                latency_ms,
            });
        }

        warn!("❌ All {} providers exhausted for {}, using fallback record", self.providers.len(), candidate);
        ResolveOutcome {
            record: NormalizedIdentityRecord::fallback(candidate),
            provider: None,
            attempts,
        }
    }

    /// One GET against one provider, reduced to a usable payload or an error
    async fn fetch(&self, provider: &ProviderDescriptor, address: IpAddr) -> AppResult<RawProviderResponse> {
        let url = provider.url_for(address);

        let response = self
            .client
            .get(&url)
            .timeout(provider.timeout())
            .send()
            .await
            .map_err(|e| tag(AppError::from(e), &provider.label))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AppError::upstream_rate_limited(&provider.label));
        }
        if !status.is_success() {
            return Err(AppError::upstream_http(&provider.label, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| tag(AppError::from(e), &provider.label))?;

        let raw = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(AppError::upstream_invalid(
                    &provider.label,
                    format!("expected JSON object, got {}", json_kind(&other)),
                ))
            }
            Err(e) => return Err(AppError::upstream_invalid(&provider.label, e)),
        };

        if normalizer::has_error_field(&raw) {
            return Err(AppError::upstream_semantic(
                &provider.label,
                normalizer::error_reason(&raw),
            ));
        }
        if !normalizer::has_ip_field(&raw) {
            return Err(AppError::upstream_missing_ip(&provider.label));
        }

        Ok(raw)
    }
}

/// Prefix a converted transport error with the provider label
fn tag(mut err: AppError, label: &str) -> AppError {
    err.message = format!("{}: {}", label, err.message);
    err
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
