//! Configuration module for the lookup service
//!
//! Uses constants from utils/constants.rs; environment variables only
//! override what a deployment needs to change.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DB_IP_DEFAULT_KEY, DB_IP_LABEL, DB_IP_TEMPLATE, DB_IP_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_RATE_LIMIT_PER_MIN, DEFAULT_REQUEST_TIMEOUT_SECS, ECHO_TIMEOUT_MS, IPAPI_CO_LABEL,
    IPAPI_CO_TEMPLATE, IPAPI_CO_TIMEOUT_MS, IPIFY_LABEL, IPIFY_URL, IP_API_COM_LABEL,
    IP_API_COM_TEMPLATE, IP_API_COM_TIMEOUT_MS, IP_PLACEHOLDER, KEY_PLACEHOLDER, MYIP_COM_LABEL,
    MYIP_COM_URL,
};

/// One upstream geolocation provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub label: String,
    /// URL with an `{ip}` placeholder
    pub endpoint_template: String,
    pub timeout_ms: u64,
}

impl ProviderDescriptor {
    pub fn new(label: impl Into<String>, endpoint_template: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            label: label.into(),
            endpoint_template: endpoint_template.into(),
            timeout_ms,
        }
    }

    /// Interpolate a parsed address into the template. Only the canonical
    /// textual form of an `IpAddr` ever reaches the URL.
    pub fn url_for(&self, address: IpAddr) -> String {
        self.endpoint_template.replace(IP_PLACEHOLDER, &address.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One "echo my IP" service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoServiceDescriptor {
    pub label: String,
    pub url: String,
    pub timeout_ms: u64,
}

impl EchoServiceDescriptor {
    pub fn new(label: impl Into<String>, url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Everything the identity pipeline needs to talk to the outside world
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Ordered provider list; earlier entries win
    pub providers: Vec<ProviderDescriptor>,
    /// Ordered echo services, consulted only for local candidates
    pub echo_services: Vec<EchoServiceDescriptor>,
}

impl LookupConfig {
    /// The three production providers, with the db-ip key substituted
    pub fn default_providers(dbip_key: &str) -> Vec<ProviderDescriptor> {
        vec![
            ProviderDescriptor::new(IPAPI_CO_LABEL, IPAPI_CO_TEMPLATE, IPAPI_CO_TIMEOUT_MS),
            ProviderDescriptor::new(IP_API_COM_LABEL, IP_API_COM_TEMPLATE, IP_API_COM_TIMEOUT_MS),
            ProviderDescriptor::new(
                DB_IP_LABEL,
                DB_IP_TEMPLATE.replace(KEY_PLACEHOLDER, dbip_key),
                DB_IP_TIMEOUT_MS,
            ),
        ]
    }

    pub fn default_echo_services() -> Vec<EchoServiceDescriptor> {
        vec![
            EchoServiceDescriptor::new(IPIFY_LABEL, IPIFY_URL, ECHO_TIMEOUT_MS),
            EchoServiceDescriptor::new(MYIP_COM_LABEL, MYIP_COM_URL, ECHO_TIMEOUT_MS),
        ]
    }

    /// Build from environment (`DBIP_API_KEY`)
    pub fn from_env() -> Self {
        let dbip_key = match std::env::var("DBIP_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                info!("🔑 DBIP_API_KEY configured (key hidden)");
                key.trim().to_string()
            }
            _ => DB_IP_DEFAULT_KEY.to_string(),
        };

        Self {
            providers: Self::default_providers(&dbip_key),
            echo_services: Self::default_echo_services(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            providers: Self::default_providers(DB_IP_DEFAULT_KEY),
            echo_services: Self::default_echo_services(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit_per_min: u32,
    pub request_timeout: Duration,
    /// Rate-limit by forwarding headers instead of the TCP peer
    pub trust_proxy: bool,
}

impl ServerConfig {
    /// Read `MYIP_HOST`, `PORT`/`MYIP_PORT`, `MYIP_RATE_LIMIT_PER_MIN`,
    /// `MYIP_REQUEST_TIMEOUT_SECS`, `MYIP_TRUST_PROXY`
    pub fn from_env() -> AppResult<Self> {
        let host = std::env::var("MYIP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        // Hosting platforms inject PORT; MYIP_PORT is for local runs
        let port = match std::env::var("PORT").or_else(|_| std::env::var("MYIP_PORT")) {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::invalid_config(format!("Invalid port: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let rate_limit_per_min = parse_env_or("MYIP_RATE_LIMIT_PER_MIN", DEFAULT_RATE_LIMIT_PER_MIN)?;
        let timeout_secs = parse_env_or("MYIP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let trust_proxy = parse_env_or("MYIP_TRUST_PROXY", false)?;

        Ok(Self {
            host,
            port,
            rate_limit_per_min,
            request_timeout: Duration::from_secs(timeout_secs),
            trust_proxy,
        })
    }

    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| AppError::invalid_config(format!("Invalid bind address {}:{}", self.host, self.port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rate_limit_per_min: DEFAULT_RATE_LIMIT_PER_MIN,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            trust_proxy: false,
        }
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::invalid_config(format!("Invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}
