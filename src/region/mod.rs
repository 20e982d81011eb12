//! Region catalogue and nearest-region search.
//!
//! [`AwsRegion`] and [`EdgeRegion`] are closed catalogues with one
//! representative coordinate each. [`find_region`] and
//! [`find_region_from_list`] pick the region with the smallest
//! great-circle distance to a point.

pub mod aws;
pub mod edge;
pub mod geo;

pub use aws::AwsRegion;
pub use edge::EdgeRegion;
pub use geo::{in_range, Location};

use ordered_float::OrderedFloat;

fn nearest<I>(location: &Location, candidates: I) -> Option<AwsRegion>
where
    I: IntoIterator<Item = AwsRegion>,
{
    candidates
        .into_iter()
        .min_by_key(|region| OrderedFloat(region.distance_to(location)))
}

/// Nearest of all AWS regions to the given point.
#[must_use]
pub fn find_region<T: Into<f64>>(latitude: T, longitude: T) -> AwsRegion {
    let location = Location::new(latitude, longitude);
    // The catalogue is a non-empty constant
    nearest(&location, AwsRegion::iter()).unwrap_or(AwsRegion::UsEast1)
}

/// Nearest of `regions` to the given point, `None` when `regions` is empty.
#[must_use]
pub fn find_region_from_list<T: Into<f64>>(
    latitude: T,
    longitude: T,
    regions: &[AwsRegion],
) -> Option<AwsRegion> {
    let location = Location::new(latitude, longitude);
    nearest(&location, regions.iter().copied())
}
