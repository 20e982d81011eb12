//! `region-nearby resolve`: print the AWS region nearest to a point.

use serde::Serialize;

use crate::cli::ResolveArgs;
use crate::error::RegionNearbyError;
use crate::region::{find_region, find_region_from_list, in_range, AwsRegion, Location};

#[derive(Debug, Serialize)]
pub struct Nearest {
    pub region: &'static str,
    pub label: &'static str,
    pub distance_km: f64,
}

pub fn nearest(
    latitude: f64,
    longitude: f64,
    replicas: &[String],
) -> Result<Nearest, RegionNearbyError> {
    let location = Location::new(latitude, longitude);
    if !in_range(&location) {
        return Err(RegionNearbyError::InvalidCoordinates(format!(
            "({latitude}, {longitude}) is outside -90..90 / -180..180"
        )));
    }

    let region = if replicas.is_empty() {
        find_region(latitude, longitude)
    } else {
        let candidates = replicas
            .iter()
            .map(|r| r.parse::<AwsRegion>())
            .collect::<Result<Vec<_>, _>>()?;
        find_region_from_list(latitude, longitude, &candidates).ok_or(RegionNearbyError::NoLocation)?
    };

    Ok(Nearest {
        region: region.name(),
        label: region.label(),
        distance_km: (region.distance_to(&location) / 100.0).round() / 10.0,
    })
}

pub fn execute(args: &ResolveArgs) -> Result<(), RegionNearbyError> {
    let nearest = nearest(args.latitude, args.longitude, &args.replicas)?;

    if args.json {
        println!("{}", serde_json::json!(nearest));
    } else {
        println!(
            "{} ({}), {} km away",
            nearest.region, nearest.label, nearest.distance_km
        );
    }
    Ok(())
}
