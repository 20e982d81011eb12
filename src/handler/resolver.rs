//! In-process nearest-region resolution.
//!
//! Picks the replica region nearest to the request. The point comes from
//! `latitude`/`longitude` query parameters when the caller supplies both,
//! otherwise from the edge region this instance runs in. Every resolution
//! is logged together with the forwarded-for chain.

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::DownstreamHandler;
use crate::config::model::Config;
use crate::error::RegionNearbyError;
use crate::forward::headers::forwarded_chain;
use crate::region::{find_region_from_list, in_range, AwsRegion, EdgeRegion, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Coordinates,
    EdgeRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Resolution {
    pub region: String,
    pub client_ip: Option<String>,
    pub forwarded_for: Vec<String>,
    pub edge_region: Option<String>,
    pub source: LocationSource,
}

#[derive(Debug, Clone)]
pub struct RegionResolver {
    edge_region: Option<EdgeRegion>,
    replicas: Vec<AwsRegion>,
}

impl RegionResolver {
    /// An empty replica list means every AWS region is a candidate.
    #[must_use]
    pub fn new(edge_region: Option<EdgeRegion>, replicas: Vec<AwsRegion>) -> Self {
        let replicas = if replicas.is_empty() {
            AwsRegion::iter().collect()
        } else {
            replicas
        };
        Self {
            edge_region,
            replicas,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, RegionNearbyError> {
        let edge_region = config
            .edge_region
            .as_deref()
            .map(str::parse::<EdgeRegion>)
            .transpose()?;
        let replicas = config
            .replica_regions
            .iter()
            .map(|r| r.parse::<AwsRegion>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(edge_region, replicas))
    }

    #[must_use]
    pub fn replicas(&self) -> &[AwsRegion] {
        &self.replicas
    }

    /// Nearest replica to the query coordinates or, failing that, the
    /// edge region.
    pub fn resolve(
        &self,
        query: Option<&str>,
    ) -> Result<(AwsRegion, LocationSource), RegionNearbyError> {
        let (location, source) = match query_location(query)? {
            Some(location) => (location, LocationSource::Coordinates),
            None => {
                let edge = self.edge_region.ok_or(RegionNearbyError::NoLocation)?;
                (edge.location(), LocationSource::EdgeRegion)
            }
        };

        let region = find_region_from_list(location.latitude(), location.longitude(), &self.replicas)
            .ok_or(RegionNearbyError::NoLocation)?;
        Ok((region, source))
    }
}

/// Coordinates from the query string. `None` unless both are present.
fn query_location(query: Option<&str>) -> Result<Option<Location>, RegionNearbyError> {
    let Some(query) = query else {
        return Ok(None);
    };

    let mut latitude = None;
    let mut longitude = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "latitude" | "lat" => latitude = Some(value.into_owned()),
            "longitude" | "lon" | "lng" => longitude = Some(value.into_owned()),
            _ => {}
        }
    }

    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        return Ok(None);
    };

    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| RegionNearbyError::InvalidCoordinates(format!("'{raw}' is not a number")))
    };
    let location = Location::new(parse(&latitude)?, parse(&longitude)?);
    if !in_range(&location) {
        return Err(RegionNearbyError::InvalidCoordinates(format!(
            "({latitude}, {longitude}) is outside -90..90 / -180..180"
        )));
    }
    Ok(Some(location))
}

#[async_trait]
impl DownstreamHandler for RegionResolver {
    fn kind(&self) -> &'static str {
        "resolver"
    }

    async fn handle(&self, request: Request) -> Result<Response, RegionNearbyError> {
        let (region, source) = self.resolve(request.uri().query())?;
        let chain = forwarded_chain(request.headers());
        let edge_region = self.edge_region.map(|r| r.name().to_string());

        tracing::info!(
            forwarded_for = %chain.join(", "),
            edge_region = edge_region.as_deref().unwrap_or("-"),
            region = %region,
            source = ?source,
            "resolved nearest region"
        );

        Ok(Json(Resolution {
            region: region.name().to_string(),
            client_ip: chain.first().cloned(),
            forwarded_for: chain,
            edge_region,
            source,
        })
        .into_response())
    }
}
