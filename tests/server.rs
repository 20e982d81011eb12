//! Integration tests for the HTTP server: health endpoint, forwarding over a
//! live socket, the upstream relay, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::any;
use axum::{Json, Router};
use region_nearby::config::model::{Config, Downstream};
use region_nearby::config::ConfigVersion;
use region_nearby::handler::build_handler;
use region_nearby::handler::resolver::{LocationSource, Resolution};
use region_nearby::health::HealthResponse;
use region_nearby::server::{self, AppState, LoadedConfig, Stats};
use serde_json::{json, Value};
use tower::ServiceExt;

fn resolver_config() -> Config {
    Config {
        edge_region: Some("europe-west3".into()),
        replica_regions: vec![
            "eu-central-1".into(),
            "us-east-1".into(),
            "ap-northeast-1".into(),
        ],
        downstream: Downstream::Resolver,
    }
}

fn upstream_config(url: String, timeout: u64) -> Config {
    Config {
        downstream: Downstream::Upstream { url, timeout },
        ..Config::default()
    }
}

fn test_state(config: Config) -> Arc<AppState> {
    let http_client = server::build_http_client();
    let handler = build_handler(&config, &http_client).unwrap();
    Arc::new(AppState {
        config: tokio::sync::RwLock::new(LoadedConfig {
            config: Arc::new(config),
            handler,
            version: ConfigVersion::Hash("0123456789abcdef".into()),
            source_name: "test".into(),
            loaded_at: Instant::now(),
        }),
        http_client,
        start_time: Instant::now(),
        stats: Stats::new(),
    })
}

async fn start_test_server(config: Config) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let router = server::build_router(test_state(config), 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}

/// Echoes what it received as JSON, with a 201 and a marker header.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl axum::response::IntoResponse {
    let forwarded_for: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let echoed = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "host": headers.get("host").and_then(|v| v.to_str().ok()),
        "forwarded_for": forwarded_for,
        "body": String::from_utf8_lossy(&body),
    });
    (StatusCode::CREATED, [("x-echo", "yes")], Json(echoed))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "late"
}

async fn start_echo_server() -> SocketAddr {
    let router = Router::new()
        .route("/slow/", any(slow))
        .fallback(echo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn health_endpoint_returns_healthy() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    let url = format!("http://{addr}/health");
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 200);

    let health: HealthResponse = resp.json().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.config.source, "test");
    assert_eq!(health.config.version, "01234567");
    assert_eq!(health.config.downstream, "resolver");
    assert_eq!(health.config.edge_region.as_deref(), Some("europe-west3"));
    assert_eq!(
        health.config.replica_regions,
        vec!["eu-central-1", "us-east-1", "ap-northeast-1"]
    );
    assert_eq!(health.stats.requests_forwarded, 0);
    assert_eq!(health.stats.requests_failed, 0);
    assert_eq!(health.stats.config_reloads, 0);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn health_version_matches_crate() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    let url = format!("http://{addr}/health");
    let health: HealthResponse = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unmatched_path_returns_404() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    let url = format!("http://{addr}/nonexistent");
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status(), 404);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn peer_address_is_appended_to_forwarded_for() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("x-forwarded-for", "10.0.0.1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resolution: Resolution = resp.json().await.unwrap();
    assert_eq!(resolution.forwarded_for, vec!["10.0.0.1", "127.0.0.1"]);
    assert_eq!(resolution.client_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(resolution.region, "eu-central-1");
    assert_eq!(resolution.source, LocationSource::EdgeRegion);

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.stats.requests_forwarded, 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn peer_address_alone_without_prior_header() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    let resolution: Resolution = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resolution.forwarded_for, vec!["127.0.0.1"]);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn query_coordinates_pick_the_region() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    // Tokyo
    let resolution: Resolution = reqwest::get(format!("http://{addr}/?latitude=35.68&longitude=139.77"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resolution.region, "ap-northeast-1");
    assert_eq!(resolution.source, LocationSource::Coordinates);

    let resp = reqwest::get(format!("http://{addr}/?latitude=200&longitude=0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn no_location_is_a_bad_request() {
    let (addr, shutdown) = start_test_server(Config::default()).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 400);

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.stats.requests_failed, 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn upstream_receives_request_with_forwarded_for() {
    let echo_addr = start_echo_server().await;
    let (addr, shutdown) = start_test_server(upstream_config(format!("http://{echo_addr}"), 2000)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/?lat=1&lon=2"))
        .header("x-forwarded-for", "10.0.0.1")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    assert_eq!(resp.headers()["x-echo"], "yes");

    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["path"], "/");
    assert_eq!(echoed["query"], "lat=1&lon=2");
    assert_eq!(echoed["host"], echo_addr.to_string());
    assert_eq!(echoed["forwarded_for"], json!(["10.0.0.1", "127.0.0.1"]));
    assert_eq!(echoed["body"], "hello");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    // Reserve a port, then free it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let (addr, shutdown) = start_test_server(upstream_config(format!("http://{dead}"), 2000)).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 502);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn slow_upstream_is_gateway_timeout() {
    let echo_addr = start_echo_server().await;
    let (addr, shutdown) =
        start_test_server(upstream_config(format!("http://{echo_addr}/slow"), 100)).await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 504);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn oversized_body_without_length_is_payload_too_large() {
    let echo_addr = start_echo_server().await;
    let state = test_state(upstream_config(format!("http://{echo_addr}"), 2000));
    let router = server::build_router(Arc::clone(&state), 16);

    // No content-length, so the limit is only hit while the body is read
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/")
        .body(Body::from(vec![b'x'; 64]))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50_000))));

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(state.stats.failed.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn graceful_shutdown_works() {
    let (addr, shutdown) = start_test_server(resolver_config()).await;

    // Verify server is running
    let url = format!("http://{addr}/health");
    assert!(reqwest::get(&url).await.is_ok());

    // Send shutdown
    let _ = shutdown.send(());

    // Give it a moment to shut down
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Server should no longer accept connections
    let result = reqwest::get(&url).await;
    assert!(result.is_err());
}
