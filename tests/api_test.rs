//! HTTP API tests (router driven in-process with `oneshot`)

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use myip_toolkit::api::{create_router, AppState, RateLimitConfig};
use myip_toolkit::{IdentityPipeline, LookupConfig, ProviderDescriptor, ResolverPool, TelemetryCollector};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_with(server: &MockServer, rate_limit: u32) -> Router {
    let config = LookupConfig {
        providers: vec![ProviderDescriptor::new(
            "geo-one",
            format!("{}/geo/{{ip}}", server.uri()),
            1000,
        )],
        echo_services: vec![],
    };
    let pipeline = IdentityPipeline::with_client(
        ResolverPool::build_client().unwrap(),
        config,
        Arc::new(TelemetryCollector::new()),
    );
    let state = Arc::new(AppState::new(Arc::new(pipeline), RateLimitConfig::per_minute(rate_limit)));
    create_router(state)
}

fn app(server: &MockServer) -> Router {
    app_with(server, 100)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-real-ip", "198.51.100.1")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_my_ip_returns_bare_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/93.184.216.34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "93.184.216.34",
            "country_name": "Ireland",
            "country_code": "IE",
            "city": "Dublin",
            "postal": "D02",
            "org": "EdgeCast",
            "asn": "AS15133"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/api/my-ip")
        .header("x-real-ip", "93.184.216.34")
        .body(Body::empty())
        .unwrap();
    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["ip"], "93.184.216.34");
    assert_eq!(body["type"], "IPv4");
    assert_eq!(body["location"]["country"], "Ireland");
    assert_eq!(body["countryCode"], "IE");
    assert_eq!(body["zip"], "D02");
    assert_eq!(body["isp"], "EdgeCast");
    assert_eq!(body["hosting"], false);
    assert_eq!(body["vpn"], false);
    assert_eq!(body["proxy"], false);
    assert_eq!(body["tor"], false);
    assert!(body.get("success").is_none(), "identity report is not wrapped");
}

#[tokio::test]
async fn test_my_ip_falls_back_when_providers_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/api/my-ip")
        .header("x-forwarded-for", "8.8.8.8, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let response = app(&server).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["ip"], "8.8.8.8");
    assert_eq!(body["location"]["country"], "Unknown");
    assert_eq!(body["location"]["timezone"], "UTC");
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let server = MockServer::start().await;
    let app = app_with(&server, 2);
    let body = json!({"principal": 1000.0, "annual_rate": 5.0, "tenure_years": 1});

    for _ in 0..2 {
        let response = app.clone().oneshot(post_json("/v1/tools/loan", body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(post_json("/v1/tools/loan", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    // Health stays reachable
    let response = app
        .oneshot(Request::builder().uri("/v1/health").header("x-real-ip", "198.51.100.1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_keys_on_peer_address() {
    let server = MockServer::start().await;
    let app = app_with(&server, 2);
    let peer: SocketAddr = "203.0.113.50:40000".parse().unwrap();
    let body = json!({"principal": 1000.0, "annual_rate": 5.0, "tenure_years": 1});

    let mut statuses = Vec::new();
    for forwarded in ["1.1.1.1", "2.2.2.2", "3.3.3.3"] {
        let mut request = Request::builder()
            .method("POST")
            .uri("/v1/tools/loan")
            .header("content-type", "application/json")
            .header("x-forwarded-for", forwarded)
            .body(Body::from(body.to_string()))
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    // Rotating the header does not buy a fresh window
    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );
}

#[tokio::test]
async fn test_loan_rejects_oversized_schedule() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(post_json(
            "/v1/tools/loan",
            json!({
                "principal": 100000.0,
                "annual_rate": 10.0,
                "tenure_years": 200000000,
                "include_schedule": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"]["details"], "TOOL_INVALID_INPUT");
}

#[tokio::test]
async fn test_loan_zero_rate() {
    let server = MockServer::start().await;
    let response = app(&server)
        .oneshot(post_json(
            "/v1/tools/loan",
            json!({"principal": 500000.0, "annual_rate": 0.0, "tenure_years": 20}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let emi = body["data"]["emi"].as_f64().unwrap();
    assert!((emi - 500000.0 / 240.0).abs() < 1e-9);
    assert_eq!(body["data"]["total_interest"], 0.0);
    assert_eq!(body["data"]["months"], 240);
}

#[tokio::test]
async fn test_invalid_tool_input_is_bad_request() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/tools/loan",
            json!({"principal": -5.0, "annual_rate": 5.0, "tenure_years": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["details"], "TOOL_INVALID_INPUT");

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/tools/convert/unit",
            json!({"category": "length", "value": 1.0, "from": "furlong", "to": "m"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json("/v1/tools/gpa", json!({"percentage": 80.0, "courses": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unit_and_color_tools() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/tools/convert/unit",
            json!({"category": "temperature", "value": 100.0, "from": "C", "to": "F"}),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert!((body["data"]["result"].as_f64().unwrap() - 212.0).abs() < 1e-9);

    let response = app
        .oneshot(post_json("/v1/tools/color", json!({"hex": "#ff0000"})))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["rgb"], json!({"r": 255, "g": 0, "b": 0}));
    assert_eq!(body["data"]["hsl"]["s"], 100.0);
    assert_eq!(body["data"]["hex"], "#ff0000");
}

#[tokio::test]
async fn test_password_tools() {
    let server = MockServer::start().await;
    let app = app(&server);

    let response = app
        .clone()
        .oneshot(post_json("/v1/tools/password/strength", json!({"password": "qwerty"})))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["score"], 0);
    assert_eq!(body["data"]["is_common"], true);

    let response = app
        .oneshot(post_json("/v1/tools/password/generate", json!({"length": 24})))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["length"], 24);
    assert_eq!(body["data"]["password"].as_str().unwrap().chars().count(), 24);
}

#[tokio::test]
async fn test_stats_count_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = app(&server);

    let request = Request::builder()
        .uri("/api/my-ip")
        .header("x-real-ip", "8.8.8.8")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap();

    let response = app
        .oneshot(Request::builder().uri("/v1/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["data"]["total_lookups"], 1);
    assert_eq!(body["data"]["fallback_lookups"], 1);
}
