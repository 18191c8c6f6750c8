//! Probe endpoints end to end.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use patroniglue::backend::HttpBackend;
use patroniglue::cache::{MemoryCache, StatusCache};
use patroniglue::config::{BackendConfig, CacheConfig, FrontendConfig};
use patroniglue::http::HttpServer;
use patroniglue::lifecycle::Shutdown;

mod common;

fn server(backend_addr: SocketAddr, ttl: f64) -> HttpServer {
    let cache: Arc<dyn StatusCache> = Arc::new(MemoryCache::new(&CacheConfig { ttl, interval: 0.25 }));
    let config = BackendConfig {
        host: backend_addr.ip().to_string(),
        port: backend_addr.port(),
        timeout: 2.0,
        connect_timeout: 1.0,
        ..BackendConfig::default()
    };
    let backend = Arc::new(HttpBackend::new(&config, cache).unwrap());
    HttpServer::new(&FrontendConfig::default(), backend)
}

async fn call(server: &HttpServer, method: Method, path: &str) -> (StatusCode, String, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, content_type, body)
}

#[tokio::test]
async fn test_health_never_touches_backend() {
    let (addr, calls) = common::start_mock_backend(&[]).await;
    let server = server(addr, 0.0);

    let (status, content_type, body) = call(&server, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({"healthy": true}));
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn test_primary_available() {
    let (addr, _) = common::start_mock_backend(&[("/primary", 200)]).await;
    let server = server(addr, 0.0);

    let (status, content_type, body) = call(&server, Method::GET, "/primary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({"primary": true}));
}

#[tokio::test]
async fn test_master_is_primary_alias() {
    let (addr, calls) = common::start_mock_backend(&[("/primary", 200)]).await;
    let server = server(addr, 0.0);

    let (status, _, body) = call(&server, Method::GET, "/master").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"primary": true}));
    assert_eq!(calls.count("/primary"), 1);
    assert_eq!(calls.count("/master"), 0);
}

#[tokio::test]
async fn test_replica_unavailable() {
    let (addr, _) = common::start_mock_backend(&[("/replica", 503)]).await;
    let server = server(addr, 0.0);

    let (status, _, body) = call(&server, Method::GET, "/replica").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"replica": false}));
}

#[tokio::test]
async fn test_each_route_maps_its_key() {
    let (addr, calls) = common::start_mock_backend(&[
        ("/read-write", 200),
        ("/read-only", 500),
    ])
    .await;
    let server = server(addr, 0.0);

    let (status, _, body) = call(&server, Method::GET, "/read-write").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"read-write": true}));

    let (status, _, body) = call(&server, Method::GET, "/read-only").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"read-only": false}));

    assert_eq!(calls.count("/read-write"), 1);
    assert_eq!(calls.count("/read-only"), 1);
}

#[tokio::test]
async fn test_options_is_dispatched() {
    let (addr, calls) = common::start_mock_backend(&[("/replica", 200)]).await;
    let server = server(addr, 0.0);

    let (status, _, body) = call(&server, Method::OPTIONS, "/replica").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"replica": true}));
    assert_eq!(calls.count("/replica"), 1);
}

#[tokio::test]
async fn test_backend_error_is_unavailable_with_message() {
    let addr = common::closed_port().await;
    let server = server(addr, 0.0);

    let (status, content_type, body) = call(&server, Method::GET, "/primary").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(content_type, "application/json");
    assert_eq!(body["primary"], json!(false));
    let message = body["error"].as_str().expect("error message in body");
    assert!(message.starts_with("could not request remote backend"), "got {message}");
}

#[tokio::test]
async fn test_probes_share_cache() {
    let (addr, calls) = common::start_mock_backend(&[("/primary", 200)]).await;
    let server = server(addr, 30.0);

    for path in ["/primary", "/master", "/primary"] {
        let (status, _, _) = call(&server, Method::GET, path).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(calls.count("/primary"), 1);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (addr, calls) = common::start_mock_backend(&[]).await;
    let server = server(addr, 0.0);

    let (status, content_type, body) = call(&server, Method::GET, "/leader").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "application/json");
    assert_eq!(body, json!({"error": "not found"}));
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn test_served_over_tcp_with_request_id() {
    let (backend_addr, _) = common::start_mock_backend(&[("/primary", 200), ("/replica", 503)]).await;
    let server = server(backend_addr, 1.0);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("http://{addr}/primary")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"primary": true}));

    let res = client.get(format!("http://{addr}/replica")).send().await.unwrap();
    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"replica": false}));

    drop(client);
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
