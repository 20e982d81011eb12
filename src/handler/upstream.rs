//! Relay to a remote HTTP service.
//!
//! The forwarded request is sent to the configured base URL joined with
//! the request's path and query. On the wire, hop-by-hop headers are
//! dropped and `Host` names the target; `X-Forwarded-For` and every other
//! end-to-end header go out as received. The upstream response comes back
//! with its status, headers and body intact apart from framing headers.

use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::response::Response;
use http_body_util::{BodyExt, Full, LengthLimitError};
use url::Url;

use super::DownstreamHandler;
use crate::error::RegionNearbyError;
use crate::forward::headers::{strip_hop_by_hop, strip_response_hop_by_hop};
use crate::server::HttpClient;

pub struct UpstreamHandler {
    client: HttpClient,
    base: Url,
    timeout: Duration,
}

impl UpstreamHandler {
    pub fn new(client: HttpClient, url: &str, timeout_ms: u64) -> Result<Self, RegionNearbyError> {
        let base = Url::parse(url).map_err(|e| RegionNearbyError::UriParse {
            source: Box::new(e),
        })?;
        Ok(Self {
            client,
            base,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Base URL with the request's path appended and its query substituted.
    #[must_use]
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.base.clone();
        let joined = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(query);
        url
    }

    fn host_header(&self) -> Option<HeaderValue> {
        let host = self.base.host_str()?;
        let value = self
            .base
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        HeaderValue::from_str(&value).ok()
    }
}

/// Whether reading the inbound body failed because it outgrew the
/// server's body limit rather than on the wire.
fn exceeds_body_limit(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

#[async_trait]
impl DownstreamHandler for UpstreamHandler {
    fn kind(&self) -> &'static str {
        "upstream"
    }

    async fn handle(&self, request: Request) -> Result<Response, RegionNearbyError> {
        let (parts, body) = request.into_parts();
        let target = self.target_url(parts.uri.path(), parts.uri.query());

        let body = body
            .collect()
            .await
            .map_err(|e| {
                if exceeds_body_limit(&e) {
                    RegionNearbyError::PayloadTooLarge
                } else {
                    RegionNearbyError::HttpRequest {
                        source: Box::new(e),
                    }
                }
            })?
            .to_bytes();

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        if let Some(host) = self.host_header() {
            headers.insert(hyper::header::HOST, host);
        }

        let mut builder = hyper::Request::builder()
            .method(parts.method)
            .uri(target.as_str());
        if let Some(map) = builder.headers_mut() {
            *map = headers;
        }
        let outgoing = builder
            .body(Full::new(body))
            .map_err(|e| RegionNearbyError::HttpRequest {
                source: Box::new(e),
            })?;

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let response = tokio::time::timeout(self.timeout, self.client.request(outgoing))
            .await
            .map_err(|_| RegionNearbyError::UpstreamTimeout { timeout_ms })?
            .map_err(|e| RegionNearbyError::HttpRequest {
                source: Box::new(e),
            })?;

        let (mut parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .map_err(|e| RegionNearbyError::HttpRequest {
                source: Box::new(e),
            })?
            .to_bytes();

        strip_response_hop_by_hop(&mut parts.headers);
        tracing::debug!(
            target_url = %target,
            status = parts.status.as_u16(),
            bytes = bytes.len(),
            "upstream responded"
        );
        Ok(Response::from_parts(parts, Body::from(bytes)))
    }
}
