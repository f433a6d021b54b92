//! Constants Module - Single Source of Truth
//!
//! Provider endpoints, timeouts, and the static lookup tables used by the
//! heuristic classifier. Nothing in here is mutated after process start.

use std::collections::HashSet;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "MyIpToolkit";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = "MyIpToolkit/0.1.0";

/// Placeholder value used for every string field with no upstream data
pub const UNKNOWN: &str = "Unknown";

/// Timezone reported when no provider supplies one
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Candidate address used when no forwarding header is present
pub const LOOPBACK_FALLBACK: &str = "127.0.0.1";

// ============================================
// GEOLOCATION PROVIDERS
// ============================================

/// Placeholder substituted with the candidate address
pub const IP_PLACEHOLDER: &str = "{ip}";

/// Placeholder substituted with the db-ip API key
pub const KEY_PLACEHOLDER: &str = "{key}";

pub const IPAPI_CO_LABEL: &str = "ipapi.co";
pub const IPAPI_CO_TEMPLATE: &str = "https://ipapi.co/{ip}/json/";
pub const IPAPI_CO_TIMEOUT_MS: u64 = 3000;

pub const IP_API_COM_LABEL: &str = "ip-api.com";
pub const IP_API_COM_TEMPLATE: &str = "http://ip-api.com/json/{ip}?fields=status,message,continent,continentCode,country,countryCode,region,regionName,city,zip,lat,lon,timezone,isp,org,as,query";
pub const IP_API_COM_TIMEOUT_MS: u64 = 5000;

pub const DB_IP_LABEL: &str = "db-ip.com";
pub const DB_IP_TEMPLATE: &str = "https://api.db-ip.com/v2/{key}/{ip}";
pub const DB_IP_TIMEOUT_MS: u64 = 3000;

/// Key used by db-ip when `DBIP_API_KEY` is not set
pub const DB_IP_DEFAULT_KEY: &str = "free";

// ============================================
// ECHO ("what is my IP") SERVICES
// ============================================

pub const IPIFY_LABEL: &str = "ipify";
pub const IPIFY_URL: &str = "https://api.ipify.org?format=json";

pub const MYIP_COM_LABEL: &str = "myip.com";
pub const MYIP_COM_URL: &str = "https://api.myip.com";

/// Timeout for each echo call
pub const ECHO_TIMEOUT_MS: u64 = 5000;

// ============================================
// SERVER DEFAULTS
// ============================================

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RATE_LIMIT_PER_MIN: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MAX_CONCURRENT_REQUESTS: usize = 512;

// ============================================
// PRIVATE / LOOPBACK PREFIXES
// ============================================

/// Literal addresses the extractor treats as local
pub const EXTRACTOR_LOCAL_LITERALS: [&str; 3] = ["127.0.0.1", "::1", "localhost"];

/// Prefixes the extractor treats as local.
/// `172.` matches the whole 172.0.0.0/8 block, not just 172.16.0.0/12.
pub const EXTRACTOR_LOCAL_PREFIXES: [&str; 3] = ["192.168.", "10.", "172."];

/// Loopback literals the classifier flags as proxy
pub const PROXY_LOOPBACK_LITERALS: [&str; 2] = ["127.0.0.1", "::1"];

/// Prefixes the classifier flags as proxy (no `172.`)
pub const PROXY_PRIVATE_PREFIXES: [&str; 2] = ["192.168.", "10."];

// ============================================
// HEURISTIC TABLES
// ============================================

/// Hosting / cloud provider keywords, matched as lowercase substrings
pub const HOSTING_KEYWORDS: [&str; 18] = [
    "amazon",
    "aws",
    "google",
    "microsoft",
    "azure",
    "digitalocean",
    "linode",
    "vultr",
    "ovh",
    "hetzner",
    "cloudflare",
    "akamai",
    "fastly",
    "oracle",
    "alibaba",
    "contabo",
    "scaleway",
    "hosting",
];

/// ASNs of known commercial VPN / proxy operators
pub const VPN_ASNS: [&str; 15] = [
    "AS9009",   // M247
    "AS20473",  // Choopa / Vultr
    "AS60068",  // Datacamp (CDN77)
    "AS212238", // Datacamp
    "AS136787", // TEFINCOM (NordVPN)
    "AS147049", // PacketHub
    "AS62240",  // Clouvider
    "AS51852",  // Private Layer
    "AS206092", // IPXO
    "AS202425", // IP Volume
    "AS49981",  // WorldStream
    "AS24940",  // Hetzner
    "AS16276",  // OVH
    "AS396982", // Google Cloud
    "AS207990", // HostRoyale
];

lazy_static::lazy_static! {
    /// VPN ASN set for O(1) membership checks
    pub static ref VPN_ASN_SET: HashSet<&'static str> = VPN_ASNS.iter().copied().collect();
}

/// Check whether an ASN string is on the VPN list
#[inline]
pub fn is_vpn_asn(asn: &str) -> bool {
    VPN_ASN_SET.contains(asn)
}

/// Check whether a lowercase organisation string names a hosting provider
pub fn matches_hosting_keyword(lowercase: &str) -> bool {
    HOSTING_KEYWORDS.iter().any(|kw| lowercase.contains(kw))
}

// ============================================
// PASSWORD TOOL CONSTANTS
// ============================================

/// Guesses per second assumed by the crack-time estimate
pub const PASSWORD_GUESS_RATE: f64 = 1e10;

pub const CHARSET_LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const CHARSET_UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const CHARSET_DIGITS: &str = "0123456789";
pub const CHARSET_SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>/?~|\\'\"`";

/// Frequently leaked passwords; membership forces the score to zero
pub const COMMON_PASSWORDS: [&str; 25] = [
    "123456", "password", "123456789", "12345678", "12345",
    "qwerty", "abc123", "football", "1234567", "monkey",
    "111111", "letmein", "1234", "1234567890", "dragon",
    "baseball", "sunshine", "iloveyou", "trustno1", "princess",
    "admin", "welcome", "password1", "qwerty123", "000000",
];

lazy_static::lazy_static! {
    pub static ref COMMON_PASSWORD_SET: HashSet<&'static str> = COMMON_PASSWORDS.iter().copied().collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(HOSTING_KEYWORDS.len(), 18);
        assert_eq!(VPN_ASNS.len(), 15);
        assert_eq!(VPN_ASN_SET.len(), 15, "VPN ASN list must not contain duplicates");
    }

    #[test]
    fn test_vpn_asn_lookup() {
        assert!(is_vpn_asn("AS9009"));
        assert!(!is_vpn_asn("AS15133"));
        assert!(!is_vpn_asn("as9009"));
    }

    #[test]
    fn test_hosting_keyword_match() {
        assert!(matches_hosting_keyword("amazon.com, inc."));
        assert!(matches_hosting_keyword("digitalocean, llc"));
        assert!(!matches_hosting_keyword("edgecast"));
    }

    #[test]
    fn test_symbol_charset_size() {
        assert_eq!(CHARSET_SYMBOLS.chars().count(), 32);
    }
}
