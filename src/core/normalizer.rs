//! Response Normalizer
//!
//! Projects one untyped provider payload onto `NormalizedIdentityRecord`.
//! Each canonical field walks a priority list of source keys seen across the
//! known providers; a key only counts when its JSON type matches. The
//! projection is total: it never fails and never leaves a field empty.

use serde_json::{Map, Value};

use crate::models::types::{AddressFamily, Connection, Location, NormalizedIdentityRecord};
use crate::utils::constants::{DEFAULT_TIMEZONE, UNKNOWN};

/// Untyped provider payload. Does not leave this module's callers.
pub type RawProviderResponse = Map<String, Value>;

/// Keys that identify a payload as describing an address
pub const IP_KEYS: [&str; 3] = ["ip", "query", "ipAddress"];

const COUNTRY_KEYS: [&str; 3] = ["country_name", "country", "countryName"];
const REGION_KEYS: [&str; 3] = ["regionName", "region", "stateProv"];
const CITY_KEYS: [&str; 2] = ["city", "cityName"];
const LATITUDE_KEYS: [&str; 2] = ["latitude", "lat"];
const LONGITUDE_KEYS: [&str; 2] = ["longitude", "lon"];
const TIMEZONE_KEYS: [&str; 2] = ["timezone", "timeZone"];
const ISP_KEYS: [&str; 3] = ["isp", "org", "organization"];
const ORGANIZATION_KEYS: [&str; 3] = ["org", "organization", "isp"];
const CONTINENT_KEYS: [&str; 4] = ["continent", "continentName", "continent_code", "continentCode"];
const COUNTRY_CODE_KEYS: [&str; 2] = ["country_code", "countryCode"];
const REGION_CODE_KEYS: [&str; 2] = ["region_code", "regionCode"];
const POSTAL_KEYS: [&str; 3] = ["postal", "zip", "zipCode"];

/// True when the payload names an address under one of the known keys
pub fn has_ip_field(raw: &RawProviderResponse) -> bool {
    first_string(raw, &IP_KEYS).is_some()
}

/// True when the payload carries an explicit `error` field.
/// `"error": false` is treated as no error.
pub fn has_error_field(raw: &RawProviderResponse) -> bool {
    match raw.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}

/// Human-readable reason from an error payload, if any
pub fn error_reason(raw: &RawProviderResponse) -> String {
    first_string(raw, &["reason", "message", "errorCode"])
        .or_else(|| raw.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unspecified".to_string())
}

/// Normalize one provider payload
pub fn normalize(raw: &RawProviderResponse, candidate: &str) -> NormalizedIdentityRecord {
    let ip = first_string(raw, &IP_KEYS).unwrap_or_else(|| candidate.trim().to_string());
    let address_family = address_family(raw, &ip);

    let location = Location {
        country: string_or_unknown(raw, &COUNTRY_KEYS),
        region: string_or_unknown(raw, &REGION_KEYS),
        city: string_or_unknown(raw, &CITY_KEYS),
        latitude: first_number(raw, &LATITUDE_KEYS).unwrap_or(0.0),
        longitude: first_number(raw, &LONGITUDE_KEYS).unwrap_or(0.0),
        timezone: timezone(raw),
    };

    let isp = string_or_unknown(raw, &ISP_KEYS);
    let organization = string_or_unknown(raw, &ORGANIZATION_KEYS);
    let connection = connection(raw, &isp, &organization);

    NormalizedIdentityRecord {
        ip,
        address_family,
        location,
        isp,
        organization,
        asn: asn(raw),
        continent: string_or_unknown(raw, &CONTINENT_KEYS),
        country_code: string_or_unknown(raw, &COUNTRY_CODE_KEYS),
        region_code: region_code(raw),
        postal_code: string_or_unknown(raw, &POSTAL_KEYS),
        connection,
    }
}

fn address_family(raw: &RawProviderResponse, ip: &str) -> AddressFamily {
    match raw.get("version").and_then(Value::as_str) {
        Some("IPv4") => return AddressFamily::IPv4,
        Some("IPv6") => return AddressFamily::IPv6,
        _ => {}
    }
    match raw.get("ipVersion").and_then(Value::as_i64) {
        Some(4) => AddressFamily::IPv4,
        Some(6) => AddressFamily::IPv6,
        _ => AddressFamily::infer(ip),
    }
}

fn timezone(raw: &RawProviderResponse) -> String {
    if let Some(tz) = first_string(raw, &TIMEZONE_KEYS) {
        return tz;
    }
    // Some providers nest it: {"time_zone": {"name": "Europe/Dublin"}}
    raw.get("time_zone")
        .and_then(Value::as_object)
        .and_then(|tz| non_empty_str(tz.get("name")))
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
}

/// `asn` if present, otherwise the leading `AS#####` token of ip-api's `as`
fn asn(raw: &RawProviderResponse) -> String {
    if let Some(asn) = first_string(raw, &["asn"]) {
        return asn;
    }
    raw.get("as")
        .and_then(Value::as_str)
        .and_then(|s| s.split_whitespace().next())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// ip-api reports the region code as `region` next to `regionName`;
/// ipapi.co uses `region` for the full name and `region_code` for the code.
fn region_code(raw: &RawProviderResponse) -> String {
    if let Some(code) = first_string(raw, &REGION_CODE_KEYS) {
        return code;
    }
    if first_string(raw, &["regionName"]).is_some() {
        if let Some(code) = first_string(raw, &["region"]) {
            return code;
        }
    }
    UNKNOWN.to_string()
}

fn connection(raw: &RawProviderResponse, isp: &str, organization: &str) -> Connection {
    let nested = raw.get("connection").and_then(Value::as_object);

    let kind = nested
        .and_then(|c| non_empty_str(c.get("type")))
        .or_else(|| first_string(raw, &["connection_type"]))
        .unwrap_or_else(|| organization.to_string());

    let conn_isp = nested
        .and_then(|c| non_empty_str(c.get("isp")))
        .unwrap_or_else(|| isp.to_string());

    Connection { kind, isp: conn_isp }
}

fn string_or_unknown(raw: &RawProviderResponse, keys: &[&str]) -> String {
    first_string(raw, keys).unwrap_or_else(|| UNKNOWN.to_string())
}

/// First key whose value is a non-empty string
fn first_string(raw: &RawProviderResponse, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty_str(raw.get(*key)))
}

/// First key whose value is a finite number
fn first_number(raw: &RawProviderResponse, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_f64))
        .filter(|n| n.is_finite())
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
