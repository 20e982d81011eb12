//! `region-nearby health`: check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::RegionNearbyError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), RegionNearbyError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| RegionNearbyError::UriParse {
                source: Box::new(e),
            })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| RegionNearbyError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| RegionNearbyError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| RegionNearbyError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| RegionNearbyError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(RegionNearbyError::HealthCheckFailed(status));
    }

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", format_summary(&args.url, &health)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn format_summary(url: &str, health: &HealthResponse) -> String {
    let config = &health.config;
    let replicas = if config.replica_regions.is_empty() {
        "none".to_string()
    } else {
        config.replica_regions.join(", ")
    };
    format!(
        "\u{2713} region-nearby is healthy ({url})\n  \
         uptime:         {}\n  \
         config source:  {}\n  \
         config version: {} (loaded {}s ago)\n  \
         downstream:     {}\n  \
         edge region:    {}\n  \
         replicas:       {replicas}\n  \
         requests:       {} forwarded, {} failed\n  \
         config reloads: {}\n",
        format_uptime(health.uptime_seconds),
        config.source,
        config.version,
        config.loaded_ago_seconds,
        config.downstream,
        config.edge_region.as_deref().unwrap_or("none"),
        health.stats.requests_forwarded,
        health.stats.requests_failed,
        health.stats.config_reloads,
    )
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
