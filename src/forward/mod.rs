//! The request forwarder.
//!
//! Turns transport metadata ("who connected") into application metadata:
//! the peer address from the [`ConnectionContext`] is appended to the
//! request's `X-Forwarded-For` header and the augmented request is handed
//! to a [`DownstreamHandler`]. Method, URI, version, extensions and body
//! pass through untouched; the handler's response, or its error, is
//! returned as-is.
//!
//! A missing peer address is a deployment fault (the server was started
//! without connect info), so the request fails with a server error and
//! the handler is never called.

pub mod headers;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::Extensions;
use axum::response::{IntoResponse, Response};

use crate::error::RegionNearbyError;
use crate::handler::DownstreamHandler;
use crate::server::AppState;

/// Transport-layer facts about the connection a request arrived on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionContext {
    remote_host: Option<String>,
}

impl ConnectionContext {
    /// Context with the given peer host, kept exactly as written.
    pub fn new(remote_host: impl Into<String>) -> Self {
        Self {
            remote_host: Some(remote_host.into()),
        }
    }

    #[must_use]
    pub const fn unavailable() -> Self {
        Self { remote_host: None }
    }

    #[must_use]
    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        Self::new(addr.ip().to_string())
    }

    /// Read the peer address axum stores when serving with
    /// `into_make_service_with_connect_info::<SocketAddr>()`.
    #[must_use]
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(Self::unavailable, |ConnectInfo(addr)| {
                Self::from_socket_addr(*addr)
            })
    }

    pub fn remote_host(&self) -> Result<&str, RegionNearbyError> {
        match self.remote_host.as_deref() {
            Some(host) if !host.trim().is_empty() => Ok(host),
            _ => Err(RegionNearbyError::MissingRemoteAddr),
        }
    }
}

/// Rebuild `request` with `remote_host` appended to `X-Forwarded-For`.
pub fn forwarded_request(request: Request, remote_host: &str) -> Result<Request, RegionNearbyError> {
    let (mut parts, body) = request.into_parts();
    parts.headers = headers::append_forwarded_for(&parts.headers, remote_host)?;
    Ok(Request::from_parts(parts, body))
}

/// Forward `request` to `handler` with the peer address attached.
pub async fn forward(
    handler: &dyn DownstreamHandler,
    connection: &ConnectionContext,
    request: Request,
) -> Result<Response, RegionNearbyError> {
    let remote_host = connection.remote_host()?;
    let outbound = forwarded_request(request, remote_host)?;
    handler.handle(outbound).await
}

pub async fn forward_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let connection = ConnectionContext::from_extensions(request.extensions());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Clone the handler Arc so the lock is released before awaiting
    let handler = {
        let loaded = state.config.read().await;
        Arc::clone(&loaded.handler)
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        remote = ?connection,
        downstream = handler.kind(),
        "request received"
    );

    match forward(handler.as_ref(), &connection, request).await {
        Ok(response) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                "request forwarded"
            );
            response
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, path = %path, error = %e, "forwarding failed");
            } else {
                tracing::warn!(request_id = %request_id, path = %path, error = %e, "request rejected");
            }
            (status, e.to_string()).into_response()
        }
    }
}
