//! Great-circle distance.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates via the haversine formula.
///
/// Pure; used only to penalize geographically distant same-score matches,
/// never as a hard filter.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_at_same_point() {
        let campus = coord(-19.8721, -43.9673);
        assert_eq!(haversine_km(campus, campus), 0.0);
    }

    #[test]
    fn symmetric() {
        let campus = coord(-19.8721, -43.9673);
        let downtown = coord(-19.9191, -43.9386);

        let there = haversine_km(campus, downtown);
        let back = haversine_km(downtown, campus);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn known_distance() {
        // Campus to downtown Belo Horizonte is roughly 6 km.
        let campus = coord(-19.8721, -43.9673);
        let downtown = coord(-19.9191, -43.9386);

        let km = haversine_km(campus, downtown);
        assert!((4.0..8.0).contains(&km), "got {km}");
    }

    #[test]
    fn monotonic_in_angular_separation() {
        let campus = coord(-19.8721, -43.9673);

        let mut last = 0.0;
        for step in 1..=10 {
            let offset = f64::from(step) * 0.05;
            let km = haversine_km(campus, coord(-19.8721 + offset, -43.9673));
            assert!(km > last, "distance should grow with separation");
            last = km;
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate_strategy() -> impl Strategy<Value = Coordinate> {
        (-89.0f64..89.0, -179.0f64..179.0)
            .prop_map(|(lat, lon)| Coordinate::new(lat, lon).unwrap())
    }

    proptest! {
        #[test]
        fn distance_is_non_negative(a in coordinate_strategy(), b in coordinate_strategy()) {
            prop_assert!(haversine_km(a, b) >= 0.0);
        }

        #[test]
        fn distance_is_symmetric(a in coordinate_strategy(), b in coordinate_strategy()) {
            let there = haversine_km(a, b);
            let back = haversine_km(b, a);
            prop_assert!((there - back).abs() < 1e-9);
        }

        #[test]
        fn bounded_by_half_circumference(a in coordinate_strategy(), b in coordinate_strategy()) {
            // Antipodal points are π × R apart.
            prop_assert!(haversine_km(a, b) <= std::f64::consts::PI * 6371.0 + 1e-6);
        }
    }
}
