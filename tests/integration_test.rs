//! Integration tests for MyIP Toolkit

use axum::http::{HeaderMap, HeaderValue};
use myip_toolkit::{
    classify, extract_candidate, is_local_address, normalize, IdentityReport, NormalizedIdentityRecord,
    RawProviderResponse,
};
use myip_toolkit::tools::{color, gpa, loan, password, units, UnitCategory};
use serde_json::json;

fn raw(value: serde_json::Value) -> RawProviderResponse {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test payload must be an object"),
    }
}

#[test]
fn test_header_precedence() {
    let mut headers = HeaderMap::new();
    headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.9"));
    headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.5 , 10.0.0.1"));

    // X-Forwarded-For wins, first entry only, trimmed
    assert_eq!(extract_candidate(&headers), "203.0.113.5");

    headers.remove("x-forwarded-for");
    assert_eq!(extract_candidate(&headers), "198.51.100.9");

    assert_eq!(extract_candidate(&HeaderMap::new()), "127.0.0.1");
}

#[test]
fn test_local_address_set() {
    for local in ["127.0.0.1", "::1", "localhost", "192.168.0.4", "10.1.2.3", "172.200.1.1"] {
        assert!(is_local_address(local), "{} should be local", local);
    }
    for public in ["8.8.8.8", "2001:4860:4860::8888", "93.184.216.34"] {
        assert!(!is_local_address(public), "{} should be public", public);
    }
}

#[test]
fn test_classifier_is_idempotent() {
    let record = normalize(
        &raw(json!({"ip": "45.32.1.1", "country": "Japan", "org": "Vultr Holdings", "asn": "AS20473"})),
        "45.32.1.1",
    );

    let first = classify(&record, "45.32.1.1");
    let second = classify(&record, "45.32.1.1");

    assert_eq!(first, second);
    assert!(first.vpn);
    assert!(first.hosting);
    assert!(!first.proxy);
    assert!(!first.tor);
}

#[test]
fn test_normalizer_total_coverage() {
    let record = normalize(&raw(json!({"ip": "8.8.8.8", "latitude": "not a number"})), "8.8.8.8");

    assert_eq!(record.location.country, "Unknown");
    assert_eq!(record.location.region, "Unknown");
    assert_eq!(record.location.latitude, 0.0);
    assert_eq!(record.location.timezone, "UTC");
    assert_eq!(record.postal_code, "Unknown");
    assert_eq!(record, {
        let mut expected = NormalizedIdentityRecord::fallback("8.8.8.8");
        expected.connection = record.connection.clone();
        expected
    });
}

#[test]
fn test_report_serialization_shape() {
    let record = NormalizedIdentityRecord::fallback("2001:db8::1");
    let flags = classify(&record, "2001:db8::1");
    let report = IdentityReport::new(record, flags);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["type"], "IPv6");
    assert_eq!(value["countryCode"], "Unknown");
    assert_eq!(value["regionCode"], "Unknown");
    assert_eq!(value["connection"]["type"], "Unknown");
    assert_eq!(value["tor"], false);
}

#[test]
fn test_loan_zero_rate_boundary() {
    let summary = loan::summarize(500_000.0, 0.0, 20).unwrap();
    assert_eq!(summary.emi, 500_000.0 / (20.0 * 12.0));
    assert_eq!(summary.total_interest, 0.0);
}

#[test]
fn test_loan_interest_grows_with_rate() {
    let low = loan::summarize(100_000.0, 5.0, 10).unwrap();
    let high = loan::summarize(100_000.0, 12.0, 10).unwrap();
    assert!(high.emi > low.emi);
    assert!(high.total_interest > low.total_interest);
}

#[test]
fn test_tools_smoke() {
    assert_eq!(password::analyze("123456").score, 0);
    assert_eq!(gpa::percentage_to_gpa(100.0).unwrap(), 4.0);
    assert!((units::convert(UnitCategory::Mass, 1.0, "kg", "lb").unwrap() - 2.204_622_621_8).abs() < 1e-6);
    assert_eq!(color::to_hex(color::parse_hex("#ABC").unwrap()), "#aabbcc");
}
