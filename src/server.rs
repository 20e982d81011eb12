//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the loaded
//! config and its downstream handler, the HTTP client, stats, and
//! uptime), [`build_router`] for constructing the Axum router with
//! middleware layers, [`build_http_client`] for the connection-pooled
//! hyper client, and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{any, get};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::model::Config;
use crate::config::ConfigVersion;
use crate::forward;
use crate::handler::DownstreamHandler;
use crate::health::health_handler;

pub struct LoadedConfig {
    pub config: Arc<Config>,
    pub handler: Arc<dyn DownstreamHandler>,
    pub version: ConfigVersion,
    pub source_name: String,
    pub loaded_at: Instant,
}

#[derive(Debug)]
pub struct Stats {
    pub forwarded: AtomicU64,
    pub failed: AtomicU64,
    pub config_reloads: AtomicU64,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            config_reloads: AtomicU64::new(0),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: RwLock<LoadedConfig>,
    pub http_client: HttpClient,
    pub start_time: Instant,
    pub stats: Stats,
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // With several rustls crypto providers compiled in, rustls cannot pick
    // one on its own. Install `ring` explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// `GET /health`, any method on `/` to the forwarder, 404 elsewhere.
///
/// Serve with `into_make_service_with_connect_info::<SocketAddr>()`;
/// without it every forwarded request fails with 500.
pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", any(forward::forward_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::body::{to_bytes, Body};
    use axum::extract::{ConnectInfo, Request};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::handler::resolver::RegionResolver;
    use crate::region::{AwsRegion, EdgeRegion};

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            config: RwLock::new(LoadedConfig {
                config: Arc::new(Config::default()),
                handler: Arc::new(RegionResolver::new(
                    Some(EdgeRegion::EuropeWest2),
                    vec![AwsRegion::EuWest2, AwsRegion::UsEast1],
                )),
                version: ConfigVersion::Hash("0123456789abcdef".into()),
                source_name: "test".into(),
                loaded_at: Instant::now(),
            }),
            http_client: build_http_client(),
            start_time: Instant::now(),
            stats: Stats::new(),
        })
    }

    #[tokio::test]
    async fn forwards_when_connect_info_present() {
        let state = state();
        let router = build_router(Arc::clone(&state), 1024);

        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let addr: SocketAddr = "203.0.113.5:50000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["region"], "eu-west-2");
        assert_eq!(json["client_ip"], "203.0.113.5");
        assert_eq!(
            state.stats.forwarded.load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn missing_connect_info_is_a_server_error() {
        let state = state();
        let router = build_router(Arc::clone(&state), 1024);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            state.stats.failed.load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let router = build_router(state(), 1024);
        let request = Request::builder()
            .uri("/elsewhere")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
