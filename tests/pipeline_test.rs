//! Resolver pool and pipeline tests against mock providers

use axum::http::{HeaderMap, HeaderValue};
use myip_toolkit::{
    AttemptStatus, EchoServiceDescriptor, ErrorCode, IdentityPipeline, LookupConfig, ProviderDescriptor,
    ResolverPool, TelemetryCollector,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LABELS: [&str; 3] = ["geo-one", "geo-two", "geo-three"];

fn lookup_config(server: &MockServer) -> LookupConfig {
    LookupConfig {
        providers: LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                ProviderDescriptor::new(*label, format!("{}/geo{}/{{ip}}", server.uri(), i + 1), 1000)
            })
            .collect(),
        echo_services: vec![
            EchoServiceDescriptor::new("echo-one", format!("{}/echo1", server.uri()), 1000),
            EchoServiceDescriptor::new("echo-two", format!("{}/echo2", server.uri()), 1000),
        ],
    }
}

fn pipeline(server: &MockServer) -> IdentityPipeline {
    let client = ResolverPool::build_client().unwrap();
    IdentityPipeline::with_client(client, lookup_config(server), Arc::new(TelemetryCollector::new()))
}

async fn mount_json(server: &MockServer, route: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn expect_untouched(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "0.0.0.0", "country": "Nowhere"})))
        .expect(0)
        .mount(server)
        .await;
}

fn ireland_payload(ip: &str) -> serde_json::Value {
    json!({
        "ip": ip,
        "version": "IPv4",
        "city": "Dublin",
        "region": "Leinster",
        "region_code": "L",
        "country_code": "IE",
        "country_name": "Ireland",
        "continent_code": "EU",
        "postal": "D02",
        "latitude": 53.3331,
        "longitude": -6.2489,
        "timezone": "Europe/Dublin",
        "asn": "AS15133",
        "org": "EdgeCast"
    })
}

fn ip_api_payload(ip: &str) -> serde_json::Value {
    json!({
        "status": "success",
        "country": "Germany",
        "countryCode": "DE",
        "regionName": "Hesse",
        "region": "HE",
        "city": "Frankfurt am Main",
        "zip": "60313",
        "lat": 50.1109,
        "lon": 8.6821,
        "timezone": "Europe/Berlin",
        "isp": "Hetzner Online GmbH",
        "org": "Hetzner",
        "as": "AS24940 Hetzner Online GmbH",
        "query": ip
    })
}

#[tokio::test]
async fn test_end_to_end_ireland_edgecast() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo1/93.184.216.34", 200, ireland_payload("93.184.216.34")).await;
    expect_untouched(&server, "/geo2/93.184.216.34").await;
    expect_untouched(&server, "/geo3/93.184.216.34").await;

    let mut headers = HeaderMap::new();
    headers.insert("x-real-ip", HeaderValue::from_static("93.184.216.34"));

    let result = pipeline(&server).lookup_headers(&headers).await;
    let report = result.report;

    assert_eq!(result.candidate, "93.184.216.34");
    assert_eq!(result.outcome.provider.as_deref(), Some("geo-one"));
    assert_eq!(result.outcome.attempts.len(), 1);
    assert_eq!(report.location.country, "Ireland");
    assert_eq!(report.location.city, "Dublin");
    assert_eq!(report.isp, "EdgeCast");
    assert_eq!(report.asn, "AS15133");
    assert!(!report.hosting);
    assert!(!report.vpn);
    assert!(!report.proxy);
    assert!(!report.tor);
}

#[tokio::test]
async fn test_rate_limited_provider_is_skipped() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo1/8.8.4.4", 429, json!({"error": true, "reason": "RateLimited"})).await;
    mount_json(&server, "/geo2/8.8.4.4", 200, ip_api_payload("8.8.4.4")).await;
    expect_untouched(&server, "/geo3/8.8.4.4").await;

    let result = pipeline(&server).lookup("8.8.4.4".to_string()).await;

    assert_eq!(result.outcome.provider.as_deref(), Some("geo-two"));
    assert_eq!(
        result.outcome.attempts[0].status,
        AttemptStatus::Skipped(ErrorCode::UpstreamRateLimited)
    );
    assert_eq!(result.report.location.country, "Germany");
    assert_eq!(result.report.asn, "AS24940");
    assert_eq!(result.report.region_code, "HE");
    assert_eq!(result.report.zip, "60313");
    assert!(result.report.hosting, "Hetzner is a hosting network");
}

#[tokio::test]
async fn test_error_payload_and_missing_ip_are_skipped() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo1/1.1.1.1", 200, json!({"ip": "1.1.1.1", "error": true, "reason": "Reserved"})).await;
    mount_json(&server, "/geo2/1.1.1.1", 200, json!({"country": "Australia"})).await;
    mount_json(
        &server,
        "/geo3/1.1.1.1",
        200,
        json!({"ipAddress": "1.1.1.1", "countryName": "Australia", "city": "Sydney", "stateProv": "New South Wales"}),
    )
    .await;

    let result = pipeline(&server).lookup("1.1.1.1".to_string()).await;
    let statuses: Vec<_> = result.outcome.attempts.iter().map(|a| a.status.clone()).collect();

    assert_eq!(
        statuses,
        vec![
            AttemptStatus::Skipped(ErrorCode::UpstreamSemanticError),
            AttemptStatus::Skipped(ErrorCode::UpstreamMissingIp),
            AttemptStatus::Accepted,
        ]
    );
    assert_eq!(result.report.location.country, "Australia");
    assert_eq!(result.report.location.region, "New South Wales");
}

#[tokio::test]
async fn test_payload_without_country_moves_on() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo1/9.9.9.9", 200, json!({"ip": "9.9.9.9", "city": "Somewhere"})).await;
    mount_json(&server, "/geo2/9.9.9.9", 200, ip_api_payload("9.9.9.9")).await;

    let result = pipeline(&server).lookup("9.9.9.9".to_string()).await;

    assert_eq!(result.outcome.attempts[0].status, AttemptStatus::NoCountry);
    assert_eq!(result.outcome.attempts[1].status, AttemptStatus::Accepted);
    // City comes from the accepted provider, never merged from the earlier one
    assert_eq!(result.report.location.city, "Frankfurt am Main");
}

#[tokio::test]
async fn test_exhaustion_returns_fallback_record() {
    let server = MockServer::start().await;
    mount_json(&server, "/geo1/4.4.4.4", 500, json!({})).await;
    Mock::given(method("GET"))
        .and(path("/geo2/4.4.4.4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    mount_json(&server, "/geo3/4.4.4.4", 200, json!(["4.4.4.4"])).await;

    let telemetry = Arc::new(TelemetryCollector::new());
    let pipeline = IdentityPipeline::with_client(
        ResolverPool::build_client().unwrap(),
        lookup_config(&server),
        telemetry.clone(),
    );
    let result = pipeline.lookup("4.4.4.4".to_string()).await;
    let report = result.report;

    assert!(result.outcome.is_fallback());
    assert_eq!(result.outcome.attempts.len(), 3);
    assert_eq!(
        result.outcome.attempts[0].status,
        AttemptStatus::Skipped(ErrorCode::UpstreamHttpError)
    );
    assert_eq!(
        result.outcome.attempts[1].status,
        AttemptStatus::Skipped(ErrorCode::UpstreamInvalidResponse)
    );
    assert_eq!(report.ip, "4.4.4.4");
    assert_eq!(report.location.country, "Unknown");
    assert_eq!(report.location.timezone, "UTC");
    assert_eq!(report.location.latitude, 0.0);
    assert_eq!(report.isp, "Unknown");
    assert_eq!(report.asn, "Unknown");
    assert_eq!(report.connection.kind, "Unknown");

    let stats = telemetry.get_stats();
    assert_eq!(stats.total_lookups, 1);
    assert_eq!(stats.fallback_lookups, 1);
    assert_eq!(stats.provider_skips, 3);
}

#[tokio::test]
async fn test_local_candidate_replaced_by_echo() {
    let server = MockServer::start().await;
    mount_json(&server, "/echo1", 503, json!({})).await;
    mount_json(&server, "/echo2", 200, json!({"ip": "203.0.113.7", "country": "Ireland", "cc": "IE"})).await;
    mount_json(&server, "/geo1/203.0.113.7", 200, ireland_payload("203.0.113.7")).await;

    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("192.168.1.10, 8.8.8.8"));

    let result = pipeline(&server).lookup_headers(&headers).await;

    assert_eq!(result.candidate, "203.0.113.7");
    assert_eq!(result.report.ip, "203.0.113.7");
    assert_eq!(result.report.location.country, "Ireland");
    assert!(!result.report.proxy);
}

#[tokio::test]
async fn test_echo_failure_keeps_local_candidate() {
    let server = MockServer::start().await;
    mount_json(&server, "/echo1", 500, json!({})).await;
    mount_json(&server, "/echo2", 200, json!({"unexpected": "shape"})).await;
    mount_json(&server, "/geo1/10.0.0.5", 200, json!({"ip": "10.0.0.5", "error": true, "reason": "Reserved IP Address"})).await;
    mount_json(&server, "/geo2/10.0.0.5", 200, json!({"status": "fail", "message": "private range", "query": "10.0.0.5"})).await;
    mount_json(&server, "/geo3/10.0.0.5", 404, json!({})).await;

    let result = pipeline(&server).lookup("10.0.0.5".to_string()).await;

    assert_eq!(result.candidate, "10.0.0.5");
    assert!(result.outcome.is_fallback());
    assert_eq!(result.report.ip, "10.0.0.5");
    assert!(result.report.proxy, "private candidate is flagged as proxy");
    assert!(!result.report.vpn);
}

#[tokio::test]
async fn test_extractor_172_is_local_but_not_proxy() {
    let server = MockServer::start().await;
    mount_json(&server, "/echo1", 500, json!({})).await;
    mount_json(&server, "/echo2", 500, json!({})).await;
    mount_json(&server, "/geo1/172.20.0.3", 500, json!({})).await;
    mount_json(&server, "/geo2/172.20.0.3", 500, json!({})).await;
    mount_json(&server, "/geo3/172.20.0.3", 500, json!({})).await;

    let result = pipeline(&server).lookup("172.20.0.3".to_string()).await;

    assert_eq!(result.candidate, "172.20.0.3");
    assert!(!result.report.proxy);
}

#[tokio::test]
async fn test_slow_provider_is_abandoned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo1/8.8.8.8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ireland_payload("8.8.8.8"))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;
    mount_json(&server, "/geo2/8.8.8.8", 200, ip_api_payload("8.8.8.8")).await;
    expect_untouched(&server, "/geo3/8.8.8.8").await;

    let mut config = lookup_config(&server);
    config.providers[0].timeout_ms = 200;
    let pipeline = IdentityPipeline::with_client(
        ResolverPool::build_client().unwrap(),
        config,
        Arc::new(TelemetryCollector::new()),
    );

    let result = pipeline.lookup("8.8.8.8".to_string()).await;

    assert_eq!(
        result.outcome.attempts[0].status,
        AttemptStatus::Skipped(ErrorCode::UpstreamTimeout)
    );
    assert!(result.outcome.attempts[0].latency_ms < 1500);
    assert_eq!(result.outcome.attempts[1].status, AttemptStatus::Accepted);
    assert_eq!(result.outcome.provider.as_deref(), Some("geo-two"));
    assert_eq!(result.report.location.country, "Germany");
}

#[tokio::test]
async fn test_non_address_candidate_never_reaches_providers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "6.6.6.6", "country": "Injected"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-forwarded-for", HeaderValue::from_static("../admin/secret#"));

    let result = pipeline(&server).lookup_headers(&headers).await;

    assert!(result.outcome.is_fallback());
    assert!(result.outcome.attempts.is_empty());
    assert_eq!(result.report.location.country, "Unknown");
    assert_ne!(result.report.ip, "6.6.6.6");
}

#[tokio::test]
async fn test_local_echo_answer_falls_through_to_next_service() {
    let server = MockServer::start().await;
    mount_json(&server, "/echo1", 200, json!({"ip": "10.9.9.9"})).await;
    mount_json(&server, "/echo2", 200, json!({"ip": "203.0.113.8"})).await;
    mount_json(&server, "/geo1/203.0.113.8", 200, ireland_payload("203.0.113.8")).await;

    let result = pipeline(&server).lookup("192.168.0.20".to_string()).await;

    assert_eq!(result.candidate, "203.0.113.8");
    assert_eq!(result.report.location.country, "Ireland");
}
