//! Heuristic Classifier
//!
//! Static-list risk flags for a normalized record. No live blacklists.
//!
//! The proxy check uses a narrower private-range set than the extractor's
//! local-address check (no `172.`); the two are intentionally independent.
//! `tor` is always false: there is no exit-node source.

use crate::models::types::{NormalizedIdentityRecord, RiskFlags};
use crate::utils::constants::{
    is_vpn_asn, matches_hosting_keyword, PROXY_LOOPBACK_LITERALS, PROXY_PRIVATE_PREFIXES,
};

/// Derive risk flags from a record and the candidate address
pub fn classify(record: &NormalizedIdentityRecord, candidate: &str) -> RiskFlags {
    RiskFlags {
        proxy: is_proxy_address(candidate),
        vpn: is_vpn_asn(&record.asn),
        tor: false,
        hosting: is_hosting(&record.isp) || is_hosting(&record.organization),
    }
}

fn is_hosting(name: &str) -> bool {
    matches_hosting_keyword(&name.to_lowercase())
}

/// Loopback, `192.168.` or `10.`
pub fn is_proxy_address(candidate: &str) -> bool {
    let candidate = candidate.trim();
    PROXY_LOOPBACK_LITERALS.contains(&candidate)
        || PROXY_PRIVATE_PREFIXES.iter().any(|p| candidate.starts_with(p))
}
