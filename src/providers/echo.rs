//! Echo Client - "what is my public IP" services
//!
//! Only used when the extracted candidate is private or loopback. Services
//! are asked in order; each gets one attempt bounded by its own timeout.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::extractor::is_local_address;
use crate::models::config::EchoServiceDescriptor;
use crate::models::errors::{AppError, AppResult};

/// Body shape shared by ipify and myip.com
#[derive(Debug, Deserialize)]
struct EchoResponse {
    ip: String,
}

#[derive(Clone)]
pub struct EchoClient {
    client: reqwest::Client,
    services: Vec<EchoServiceDescriptor>,
}

impl EchoClient {
    pub fn new(client: reqwest::Client, services: Vec<EchoServiceDescriptor>) -> Self {
        Self { client, services }
    }

    pub fn services(&self) -> &[EchoServiceDescriptor] {
        &self.services
    }

    /// First non-local address any echo service reports, or `None` if all
    /// fail or only report local ones
    pub async fn public_address(&self) -> Option<String> {
        for service in &self.services {
            match self.fetch(service).await {
                Ok(ip) if is_local_address(&ip) => {
                    warn!("⚠️ {} reported local address {}, trying next", service.label, ip);
                }
                Ok(ip) => {
                    debug!("📡 {} reports public address {}", service.label, ip);
                    return Some(ip);
                }
                Err(e) => {
                    warn!("⚠️ Echo service failed: {}", e);
                }
            }
        }
        None
    }

    async fn fetch(&self, service: &EchoServiceDescriptor) -> AppResult<String> {
        let response = self
            .client
            .get(&service.url)
            .timeout(service.timeout())
            .send()
            .await
            .map_err(|e| AppError::echo_failed(&service.label, e))?;

        if !response.status().is_success() {
            return Err(AppError::echo_failed(
                &service.label,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: EchoResponse = response
            .json()
            .await
            .map_err(|e| AppError::echo_failed(&service.label, e))?;

        let ip = body.ip.trim();
        if ip.is_empty() {
            return Err(AppError::echo_failed(&service.label, "empty ip field"));
        }
        Ok(ip.to_string())
    }
}
