//! The AWS region catalogue.

use std::fmt;
use std::str::FromStr;

use super::geo::Location;
use crate::error::RegionNearbyError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AwsRegion {
    AfSouth1,
    ApEast1,
    ApNortheast1,
    ApNortheast2,
    ApNortheast3,
    ApSouth1,
    ApSoutheast1,
    ApSoutheast2,
    ApSoutheast3,
    CaCentral1,
    CnNorth1,
    CnNorthwest1,
    EuCentral1,
    EuNorth1,
    EuSouth1,
    EuWest1,
    EuWest2,
    EuWest3,
    MeSouth1,
    SaEast1,
    UsEast1,
    UsEast2,
    UsWest1,
    UsWest2,
    UsGovEast1,
    UsGovWest1,
}

const ALL: [AwsRegion; 26] = [
    AwsRegion::AfSouth1,
    AwsRegion::ApEast1,
    AwsRegion::ApNortheast1,
    AwsRegion::ApNortheast2,
    AwsRegion::ApNortheast3,
    AwsRegion::ApSouth1,
    AwsRegion::ApSoutheast1,
    AwsRegion::ApSoutheast2,
    AwsRegion::ApSoutheast3,
    AwsRegion::CaCentral1,
    AwsRegion::CnNorth1,
    AwsRegion::CnNorthwest1,
    AwsRegion::EuCentral1,
    AwsRegion::EuNorth1,
    AwsRegion::EuSouth1,
    AwsRegion::EuWest1,
    AwsRegion::EuWest2,
    AwsRegion::EuWest3,
    AwsRegion::MeSouth1,
    AwsRegion::SaEast1,
    AwsRegion::UsEast1,
    AwsRegion::UsEast2,
    AwsRegion::UsWest1,
    AwsRegion::UsWest2,
    AwsRegion::UsGovEast1,
    AwsRegion::UsGovWest1,
];

impl AwsRegion {
    /// All regions in catalogue order. Ties in nearest-region search
    /// resolve to the region that comes first here.
    pub fn iter() -> impl Iterator<Item = Self> {
        ALL.iter().copied()
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AfSouth1 => "af-south-1",
            Self::ApEast1 => "ap-east-1",
            Self::ApNortheast1 => "ap-northeast-1",
            Self::ApNortheast2 => "ap-northeast-2",
            Self::ApNortheast3 => "ap-northeast-3",
            Self::ApSouth1 => "ap-south-1",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::ApSoutheast3 => "ap-southeast-3",
            Self::CaCentral1 => "ca-central-1",
            Self::CnNorth1 => "cn-north-1",
            Self::CnNorthwest1 => "cn-northwest-1",
            Self::EuCentral1 => "eu-central-1",
            Self::EuNorth1 => "eu-north-1",
            Self::EuSouth1 => "eu-south-1",
            Self::EuWest1 => "eu-west-1",
            Self::EuWest2 => "eu-west-2",
            Self::EuWest3 => "eu-west-3",
            Self::MeSouth1 => "me-south-1",
            Self::SaEast1 => "sa-east-1",
            Self::UsEast1 => "us-east-1",
            Self::UsEast2 => "us-east-2",
            Self::UsWest1 => "us-west-1",
            Self::UsWest2 => "us-west-2",
            Self::UsGovEast1 => "us-gov-east-1",
            Self::UsGovWest1 => "us-gov-west-1",
        }
    }

    /// Human-readable label as shown in the AWS console.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AfSouth1 => "Africa (Cape Town)",
            Self::ApEast1 => "Asia Pacific (Hong Kong)",
            Self::ApNortheast1 => "Asia Pacific (Tokyo)",
            Self::ApNortheast2 => "Asia Pacific (Seoul)",
            Self::ApNortheast3 => "Asia Pacific (Osaka)",
            Self::ApSouth1 => "Asia Pacific (Mumbai)",
            Self::ApSoutheast1 => "Asia Pacific (Singapore)",
            Self::ApSoutheast2 => "Asia Pacific (Sydney)",
            Self::ApSoutheast3 => "Asia Pacific (Jakarta)",
            Self::CaCentral1 => "Canada (Central)",
            Self::CnNorth1 => "China (Beijing)",
            Self::CnNorthwest1 => "China (Ningxia)",
            Self::EuCentral1 => "Europe (Frankfurt)",
            Self::EuNorth1 => "Europe (Stockholm)",
            Self::EuSouth1 => "Europe (Milan)",
            Self::EuWest1 => "Europe (Ireland)",
            Self::EuWest2 => "Europe (London)",
            Self::EuWest3 => "Europe (Paris)",
            Self::MeSouth1 => "Middle East (Bahrain)",
            Self::SaEast1 => "South America (S\u{e3}o Paulo)",
            Self::UsEast1 => "US East (N. Virginia)",
            Self::UsEast2 => "US East (Ohio)",
            Self::UsWest1 => "US West (N. California)",
            Self::UsWest2 => "US West (Oregon)",
            Self::UsGovEast1 => "GovCloud (US-East)",
            Self::UsGovWest1 => "GovCloud (US-West)",
        }
    }

    /// Representative coordinate of the region (the airport nearest its
    /// data centers). GovCloud regions share their commercial neighbours'.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::AfSouth1 => Location::new_const(-33.964_801_788_3, 18.601_699_829_1),
            Self::ApEast1 => Location::new_const(22.308_901, 113.915_001),
            Self::ApNortheast1 => Location::new_const(35.764_702, 140.386_002),
            Self::ApNortheast2 => Location::new_const(37.469_100_952_148_44, 126.450_996_398_925_78),
            Self::ApNortheast3 => Location::new_const(34.427_299_499_511_72, 135.244_003_295_898_44),
            Self::ApSouth1 => Location::new_const(19.088_699_340_8, 72.867_897_033_7),
            Self::ApSoutheast1 => Location::new_const(1.350_19, 103.994_003),
            Self::ApSoutheast2 => Location::new_const(-33.946_098_327_636_72, 151.177_001_953_125),
            Self::ApSoutheast3 => Location::new_const(-6.125_556, 106.655_833),
            Self::CaCentral1 => Location::new_const(45.470_556, -73.740_833),
            Self::CnNorth1 => Location::new_const(40.080_101_013_183_594, 116.584_999_084_472_66),
            Self::CnNorthwest1 => Location::new_const(38.321_667, 106.3925),
            Self::EuCentral1 => Location::new_const(50.033_333, 8.570_556),
            Self::EuNorth1 => Location::new_const(59.651_901_245_117, 17.918_600_082_397),
            Self::EuSouth1 => Location::new_const(45.6306, 8.728_11),
            Self::EuWest1 => Location::new_const(53.421_299, -6.270_07),
            Self::EuWest2 => Location::new_const(51.4775, -0.461_389),
            Self::EuWest3 => Location::new_const(49.012_798, 2.55),
            Self::MeSouth1 => Location::new_const(26.270_799_636_840_82, 50.633_598_327_636_72),
            Self::SaEast1 => Location::new_const(-23.435_556, -46.473_056),
            Self::UsEast1 | Self::UsGovEast1 => Location::new_const(38.9445, -77.455_802_9),
            Self::UsEast2 => Location::new_const(39.958_993_960_575_775, -83.002_190_861_487_25),
            Self::UsWest1 | Self::UsGovWest1 => Location::new_const(37.618_999_481_201_17, -122.375),
            Self::UsWest2 => Location::new_const(45.540_394, -122.949_825),
        }
    }

    /// Distance in meters between the region and `to`.
    #[must_use]
    pub fn distance_to(&self, to: &Location) -> f64 {
        self.location().haversine_distance_to(to).meters()
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AwsRegion {
    type Err = RegionNearbyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::iter()
            .find(|region| region.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RegionNearbyError::InvalidAwsRegion(s.to_string()))
    }
}

impl TryFrom<&str> for AwsRegion {
    type Error = RegionNearbyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::geo::in_range;

    #[test]
    fn names() {
        assert_eq!(AwsRegion::EuCentral1.name(), "eu-central-1");
        assert_eq!(AwsRegion::CnNorthwest1.name(), "cn-northwest-1");
        assert_eq!(AwsRegion::UsGovWest1.to_string(), "us-gov-west-1");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("eu-west-2".parse::<AwsRegion>().unwrap(), AwsRegion::EuWest2);
        assert_eq!("EU-WEST-2".parse::<AwsRegion>().unwrap(), AwsRegion::EuWest2);
        assert_eq!(AwsRegion::try_from(" us-east-1 ").unwrap(), AwsRegion::UsEast1);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "mars-north-1".parse::<AwsRegion>().unwrap_err();
        assert!(matches!(err, RegionNearbyError::InvalidAwsRegion(ref name) if name == "mars-north-1"));
    }

    #[test]
    fn every_name_round_trips() {
        for region in AwsRegion::iter() {
            assert_eq!(region.name().parse::<AwsRegion>().unwrap(), region);
        }
    }

    #[test]
    fn iteration_order() {
        assert_eq!(AwsRegion::iter().next(), Some(AwsRegion::AfSouth1));
        assert_eq!(AwsRegion::iter().last(), Some(AwsRegion::UsGovWest1));
        assert_eq!(AwsRegion::iter().count(), 26);
    }

    #[test]
    fn every_location_is_valid() {
        assert!(AwsRegion::iter().all(|r| in_range(&r.location())));
    }

    #[test]
    fn distance_between_neighbours() {
        let region = AwsRegion::EuWest1;
        assert_eq!(region.distance_to(&region.location()), 0.0);
        assert_eq!(region.distance_to(&AwsRegion::EuWest2.location()), 448_890.249);
        assert_eq!(region.distance_to(&AwsRegion::EuWest3.location()), 784_967.795);
    }
}
