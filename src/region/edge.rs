//! Edge deployment regions.
//!
//! Edge hosting platforms run on GCP-named regions (`europe-west3`,
//! `us-east4`, ...). An instance that knows which edge region it runs in
//! can pick the nearest AWS replica without any per-request geolocation.
//! Where a platform only publishes a country, the coordinate is the most
//! likely host city.

use std::fmt;
use std::str::FromStr;

use super::aws::AwsRegion;
use super::geo::Location;
use crate::error::RegionNearbyError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EdgeRegion {
    /// Taiwan
    AsiaEast1,
    /// Hong Kong
    AsiaEast2,
    /// Tokyo
    AsiaNortheast1,
    /// Osaka
    AsiaNortheast2,
    /// Seoul
    AsiaNortheast3,
    /// Mumbai
    AsiaSouth1,
    /// Delhi
    AsiaSouth2,
    /// Singapore
    AsiaSoutheast1,
    /// Jakarta
    AsiaSoutheast2,
    /// Sydney
    AustraliaSoutheast1,
    /// Melbourne
    AustraliaSoutheast2,
    /// Warsaw
    EuropeCentral2,
    /// Finland
    EuropeNorth1,
    /// Belgium
    EuropeWest1,
    /// London
    EuropeWest2,
    /// Frankfurt
    EuropeWest3,
    /// Netherlands
    EuropeWest4,
    /// Zurich
    EuropeWest6,
    /// Milan
    EuropeWest8,
    /// Paris
    EuropeWest9,
    /// Madrid
    EuropeSouthwest1,
    /// Tel Aviv
    MeWest1,
    /// Montréal
    NorthamericaNortheast1,
    /// Toronto
    NorthamericaNortheast2,
    /// São Paulo
    SouthamericaEast1,
    /// Chile
    SouthamericaWest1,
    /// Iowa
    UsCentral1,
    /// South Carolina
    UsEast1,
    /// Northern Virginia
    UsEast4,
    /// Ohio
    UsEast5,
    /// Texas
    UsSouth1,
    /// Oregon
    UsWest1,
    /// California
    UsWest2,
    /// Utah
    UsWest3,
    /// Nevada
    UsWest4,
}

const ALL: [EdgeRegion; 35] = [
    EdgeRegion::AsiaEast1,
    EdgeRegion::AsiaEast2,
    EdgeRegion::AsiaNortheast1,
    EdgeRegion::AsiaNortheast2,
    EdgeRegion::AsiaNortheast3,
    EdgeRegion::AsiaSouth1,
    EdgeRegion::AsiaSouth2,
    EdgeRegion::AsiaSoutheast1,
    EdgeRegion::AsiaSoutheast2,
    EdgeRegion::AustraliaSoutheast1,
    EdgeRegion::AustraliaSoutheast2,
    EdgeRegion::EuropeCentral2,
    EdgeRegion::EuropeNorth1,
    EdgeRegion::EuropeWest1,
    EdgeRegion::EuropeWest2,
    EdgeRegion::EuropeWest3,
    EdgeRegion::EuropeWest4,
    EdgeRegion::EuropeWest6,
    EdgeRegion::EuropeWest8,
    EdgeRegion::EuropeWest9,
    EdgeRegion::EuropeSouthwest1,
    EdgeRegion::MeWest1,
    EdgeRegion::NorthamericaNortheast1,
    EdgeRegion::NorthamericaNortheast2,
    EdgeRegion::SouthamericaEast1,
    EdgeRegion::SouthamericaWest1,
    EdgeRegion::UsCentral1,
    EdgeRegion::UsEast1,
    EdgeRegion::UsEast4,
    EdgeRegion::UsEast5,
    EdgeRegion::UsSouth1,
    EdgeRegion::UsWest1,
    EdgeRegion::UsWest2,
    EdgeRegion::UsWest3,
    EdgeRegion::UsWest4,
];

impl EdgeRegion {
    pub fn iter() -> impl Iterator<Item = Self> {
        ALL.iter().copied()
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AsiaEast1 => "asia-east1",
            Self::AsiaEast2 => "asia-east2",
            Self::AsiaNortheast1 => "asia-northeast1",
            Self::AsiaNortheast2 => "asia-northeast2",
            Self::AsiaNortheast3 => "asia-northeast3",
            Self::AsiaSouth1 => "asia-south1",
            Self::AsiaSouth2 => "asia-south2",
            Self::AsiaSoutheast1 => "asia-southeast1",
            Self::AsiaSoutheast2 => "asia-southeast2",
            Self::AustraliaSoutheast1 => "australia-southeast1",
            Self::AustraliaSoutheast2 => "australia-southeast2",
            Self::EuropeCentral2 => "europe-central2",
            Self::EuropeNorth1 => "europe-north1",
            Self::EuropeWest1 => "europe-west1",
            Self::EuropeWest2 => "europe-west2",
            Self::EuropeWest3 => "europe-west3",
            Self::EuropeWest4 => "europe-west4",
            Self::EuropeWest6 => "europe-west6",
            Self::EuropeWest8 => "europe-west8",
            Self::EuropeWest9 => "europe-west9",
            Self::EuropeSouthwest1 => "europe-southwest1",
            Self::MeWest1 => "me-west1",
            Self::NorthamericaNortheast1 => "northamerica-northeast1",
            Self::NorthamericaNortheast2 => "northamerica-northeast2",
            Self::SouthamericaEast1 => "southamerica-east1",
            Self::SouthamericaWest1 => "southamerica-west1",
            Self::UsCentral1 => "us-central1",
            Self::UsEast1 => "us-east1",
            Self::UsEast4 => "us-east4",
            Self::UsEast5 => "us-east5",
            Self::UsSouth1 => "us-south1",
            Self::UsWest1 => "us-west1",
            Self::UsWest2 => "us-west2",
            Self::UsWest3 => "us-west3",
            Self::UsWest4 => "us-west4",
        }
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::AsiaEast1 => Location::new_const(25.0478, 121.5319), // Taipei
            Self::AsiaEast2 => Location::new_const(22.3069, 114.1831),
            Self::AsiaNortheast1 => Location::new_const(35.6839, 139.7744),
            Self::AsiaNortheast2 => Location::new_const(34.7520, 135.4582),
            Self::AsiaNortheast3 => Location::new_const(37.5600, 126.9900),
            Self::AsiaSouth1 => Location::new_const(19.0758, 72.8775),
            Self::AsiaSouth2 => Location::new_const(28.6667, 77.2167),
            Self::AsiaSoutheast1 => Location::new_const(1.3000, 103.8000),
            Self::AsiaSoutheast2 => Location::new_const(-6.2146, 106.8451),
            Self::AustraliaSoutheast1 => Location::new_const(-33.8650, 151.2094),
            Self::AustraliaSoutheast2 => Location::new_const(-37.8136, 144.963),
            Self::EuropeCentral2 => Location::new_const(52.2300, 21.0111),
            Self::EuropeNorth1 => Location::new_const(60.1756, 24.9342), // Helsinki
            Self::EuropeWest1 => Location::new_const(50.8353, 4.3314),   // Brussels
            Self::EuropeWest2 => Location::new_const(51.5072, -0.1275),
            Self::EuropeWest3 => Location::new_const(50.1136, 8.6797),
            Self::EuropeWest4 => Location::new_const(52.3667, 4.8833), // Amsterdam
            Self::EuropeWest6 => Location::new_const(47.3744, 8.5411),
            Self::EuropeWest8 => Location::new_const(45.4669, 9.1900),
            Self::EuropeWest9 => Location::new_const(48.8566, 2.3522),
            Self::EuropeSouthwest1 => Location::new_const(40.4167, -3.7167),
            Self::MeWest1 => Location::new_const(32.0800, 34.7800),
            Self::NorthamericaNortheast1 => Location::new_const(45.5089, -73.5617),
            Self::NorthamericaNortheast2 => Location::new_const(43.7417, -79.3733),
            Self::SouthamericaEast1 => Location::new_const(-23.5504, -46.6339),
            Self::SouthamericaWest1 => Location::new_const(-33.4500, -70.6667), // Santiago
            Self::UsCentral1 => Location::new_const(41.5725, -93.6105),        // Des Moines
            Self::UsEast1 => Location::new_const(34.0376, -80.9037),           // Columbia, SC
            Self::UsEast4 => Location::new_const(39.0300, -77.4711),           // Ashburn
            Self::UsEast5 => Location::new_const(39.9862, -82.9850),           // Columbus
            Self::UsSouth1 => Location::new_const(30.3004, -97.7522),          // Austin
            Self::UsWest1 => Location::new_const(45.5272, -122.9361),          // Hillsboro
            Self::UsWest2 => Location::new_const(37.7562, -122.4430),          // San Francisco
            Self::UsWest3 => Location::new_const(40.7777, -111.9306),          // Salt Lake City
            Self::UsWest4 => Location::new_const(39.1512, -119.7474),          // Carson City
        }
    }

    #[must_use]
    pub fn distance_to(&self, to: &Location) -> f64 {
        self.location().haversine_distance_to(to).meters()
    }

    /// Nearest of `regions` to this edge region, `None` when `regions` is empty.
    #[must_use]
    pub fn find_region_from_list(&self, regions: &[AwsRegion]) -> Option<AwsRegion> {
        let location = self.location();
        super::find_region_from_list(location.latitude(), location.longitude(), regions)
    }
}

impl From<EdgeRegion> for AwsRegion {
    fn from(region: EdgeRegion) -> Self {
        let location = region.location();
        super::find_region(location.latitude(), location.longitude())
    }
}

impl fmt::Display for EdgeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeRegion {
    type Err = RegionNearbyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::iter()
            .find(|region| region.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RegionNearbyError::InvalidEdgeRegion(s.to_string()))
    }
}

impl TryFrom<&str> for EdgeRegion {
    type Error = RegionNearbyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
