//! Geographic coordinates.
//!
//! [`Location`] comes from `geoutils`; distances are haversine great-circle
//! distances in meters.

pub use geoutils::Location;

/// Whether both coordinates are finite and inside -90..90 / -180..180.
#[must_use]
pub fn in_range(location: &Location) -> bool {
    (-90.0..=90.0).contains(&location.latitude()) && (-180.0..=180.0).contains(&location.longitude())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let dublin = Location::new(53.421_299, -6.270_07);
        assert_eq!(dublin.haversine_distance_to(&dublin).meters(), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let dublin = Location::new(53.421_299, -6.270_07);
        let london = Location::new(51.4775, -0.461_389);
        let there = dublin.haversine_distance_to(&london).meters();
        let back = london.haversine_distance_to(&dublin).meters();
        assert!((there - back).abs() < 0.01);
    }

    #[test]
    fn dublin_to_london() {
        let dublin = Location::new(53.421_299, -6.270_07);
        let london = Location::new(51.4775, -0.461_389);
        assert_eq!(dublin.haversine_distance_to(&london).meters(), 448_890.249);
    }

    #[test]
    fn range_checks() {
        assert!(in_range(&Location::new(90.0, -180.0)));
        assert!(!in_range(&Location::new(90.1, 0.0)));
        assert!(!in_range(&Location::new(0.0, 180.5)));
        assert!(!in_range(&Location::new(f64::NAN, 0.0)));
    }
}
