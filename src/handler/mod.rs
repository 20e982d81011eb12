//! Downstream handlers: the stage that produces the actual response.
//!
//! The forwarder only sees the [`DownstreamHandler`] trait, so the
//! in-process [`RegionResolver`](resolver::RegionResolver), the
//! [`UpstreamHandler`](upstream::UpstreamHandler) relay, and test stubs
//! are interchangeable. [`build_handler`] picks one from the config.

pub mod resolver;
pub mod upstream;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

use crate::config::model::{Config, Downstream};
use crate::error::RegionNearbyError;
use crate::server::HttpClient;

// async_trait keeps the trait object-safe; the server holds Arc<dyn DownstreamHandler>.
#[async_trait]
pub trait DownstreamHandler: Send + Sync {
    /// Short label for logs and the health report.
    fn kind(&self) -> &'static str;

    async fn handle(&self, request: Request) -> Result<Response, RegionNearbyError>;
}

/// Build the handler described by a validated config.
pub fn build_handler(
    config: &Config,
    client: &HttpClient,
) -> Result<Arc<dyn DownstreamHandler>, RegionNearbyError> {
    match &config.downstream {
        Downstream::Resolver => Ok(Arc::new(resolver::RegionResolver::from_config(config)?)),
        Downstream::Upstream { url, timeout } => Ok(Arc::new(upstream::UpstreamHandler::new(
            client.clone(),
            url,
            *timeout,
        )?)),
    }
}
