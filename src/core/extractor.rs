//! Client-IP Extractor
//!
//! Picks the best-guess origin address from forwarding headers and, when
//! that address is private or loopback, asks the echo services for the
//! public one. Never fails: the worst case is the loopback literal.

use axum::http::HeaderMap;
use tracing::{debug, info, warn};

use crate::providers::echo::EchoClient;
use crate::utils::constants::{EXTRACTOR_LOCAL_LITERALS, EXTRACTOR_LOCAL_PREFIXES, LOOPBACK_FALLBACK};

/// Headers consulted, in priority order
pub const CLIENT_IP_HEADERS: [&str; 4] = [
    "x-forwarded-for",
    "x-real-ip",
    "cf-connecting-ip",
    "x-client-ip",
];

/// Best-guess origin address from request headers alone
pub fn extract_candidate(headers: &HeaderMap) -> String {
    for name in CLIENT_IP_HEADERS {
        let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) else {
            continue;
        };

        // X-Forwarded-For can contain multiple IPs, take the first (original client)
        let first = if name == "x-forwarded-for" {
            value.split(',').next().unwrap_or_default()
        } else {
            value
        };

        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    LOOPBACK_FALLBACK.to_string()
}

/// Loopback, `localhost`, or a `192.168.` / `10.` / `172.` prefix.
/// The `172.` check is broader than 172.16.0.0/12.
pub fn is_local_address(address: &str) -> bool {
    let address = address.trim();
    EXTRACTOR_LOCAL_LITERALS.contains(&address)
        || EXTRACTOR_LOCAL_PREFIXES.iter().any(|p| address.starts_with(p))
}

/// Replace a local candidate with the public address reported by the echo
/// services, if any of them answers with a non-local one
pub async fn resolve_public_candidate(candidate: String, echo: &EchoClient) -> String {
    if !is_local_address(&candidate) {
        return candidate;
    }

    debug!("🏠 Candidate {} is local, asking echo services", candidate);

    match echo.public_address().await {
        Some(public) => {
            info!("🔁 Replaced local candidate {} with {}", candidate, public);
            public
        }
        None => {
            warn!("⚠️ No echo service reported a public address, keeping local candidate {}", candidate);
            candidate
        }
    }
}

/// Header extraction followed by echo fallback
pub async fn resolve_candidate(headers: &HeaderMap, echo: &EchoClient) -> String {
    resolve_public_candidate(extract_candidate(headers), echo).await
}
