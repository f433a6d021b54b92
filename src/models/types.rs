//! Type definitions for the identity lookup pipeline
//! All canonical data structures shared by normalizer, classifier and API

use serde::{Deserialize, Serialize};

use crate::utils::constants::{DEFAULT_TIMEZONE, UNKNOWN};

/// Address family of a candidate or resolved address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

impl AddressFamily {
    /// Infer the family from the textual form: anything with a colon is IPv6
    pub fn infer(address: &str) -> Self {
        if address.contains(':') {
            AddressFamily::IPv6
        } else {
            AddressFamily::IPv4
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::IPv4 => "IPv4",
            AddressFamily::IPv6 => "IPv6",
        }
    }
}

/// Geographic part of a normalized record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Location {
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    /// A location is only accepted when the country is known
    pub fn has_country(&self) -> bool {
        !self.country.is_empty() && self.country != UNKNOWN
    }
}

/// Connection details reported by (or derived for) a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "type")]
    pub kind: String,
    pub isp: String,
}

/// Canonical record every provider response is coerced into.
///
/// Every field always holds a concrete value: absent strings are `"Unknown"`,
/// absent numbers are `0`, an absent timezone is `"UTC"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIdentityRecord {
    pub ip: String,
    pub address_family: AddressFamily,
    pub location: Location,
    pub isp: String,
    pub organization: String,
    pub asn: String,
    pub continent: String,
    pub country_code: String,
    pub region_code: String,
    pub postal_code: String,
    pub connection: Connection,
}

impl NormalizedIdentityRecord {
    /// Record returned when every provider was exhausted
    pub fn fallback(candidate: &str) -> Self {
        Self {
            ip: candidate.to_string(),
            address_family: AddressFamily::infer(candidate),
            location: Location::unknown(),
            isp: UNKNOWN.to_string(),
            organization: UNKNOWN.to_string(),
            asn: UNKNOWN.to_string(),
            continent: UNKNOWN.to_string(),
            country_code: UNKNOWN.to_string(),
            region_code: UNKNOWN.to_string(),
            postal_code: UNKNOWN.to_string(),
            connection: Connection {
                kind: UNKNOWN.to_string(),
                isp: UNKNOWN.to_string(),
            },
        }
    }
}

/// Heuristic risk indicators derived from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskFlags {
    pub proxy: bool,
    pub vpn: bool,
    pub tor: bool,
    pub hosting: bool,
}

impl RiskFlags {
    pub fn any(&self) -> bool {
        self.proxy || self.vpn || self.tor || self.hosting
    }
}

/// Final `GET /api/my-ip` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityReport {
    pub ip: String,
    #[serde(rename = "type")]
    pub address_family: AddressFamily,
    pub location: Location,
    pub isp: String,
    pub organization: String,
    pub asn: String,
    pub continent: String,
    pub country_code: String,
    pub region_code: String,
    pub zip: String,
    pub connection: Connection,
    pub proxy: bool,
    pub vpn: bool,
    pub tor: bool,
    pub hosting: bool,
}

impl IdentityReport {
    pub fn new(record: NormalizedIdentityRecord, flags: RiskFlags) -> Self {
        Self {
            ip: record.ip,
            address_family: record.address_family,
            location: record.location,
            isp: record.isp,
            organization: record.organization,
            asn: record.asn,
            continent: record.continent,
            country_code: record.country_code,
            region_code: record.region_code,
            zip: record.postal_code,
            connection: record.connection,
            proxy: flags.proxy,
            vpn: flags.vpn,
            tor: flags.tor,
            hosting: flags.hosting,
        }
    }

    pub fn flags(&self) -> RiskFlags {
        RiskFlags {
            proxy: self.proxy,
            vpn: self.vpn,
            tor: self.tor,
            hosting: self.hosting,
        }
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "IP: {} ({}) | {}, {} | ISP: {} | ASN: {} | proxy={} vpn={} hosting={}",
            self.ip,
            self.address_family.as_str(),
            self.location.city,
            self.location.country,
            self.isp,
            self.asn,
            self.proxy,
            self.vpn,
            self.hosting,
        )
    }
}
