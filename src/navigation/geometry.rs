//! Great-circle helpers for stepping between coordinates

use crate::common::types::Coordinate;

/// Mean Earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Haversine distance between two coordinates in meters
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Initial bearing from `from` to `to`, degrees clockwise from north in [0, 360)
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlng = (to.longitude - from.longitude).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Coordinate reached by travelling `meters` along `bearing_deg` from `origin`.
/// The origin's altitude is carried over.
pub fn project(origin: Coordinate, meters: f64, bearing_deg: f64) -> Coordinate {
    if meters == 0.0 {
        return origin;
    }
    let angular = meters / EARTH_RADIUS;
    let heading = bearing_deg.to_radians();
    let lat1 = origin.latitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * heading.cos()).asin();
    let dlng = (heading.sin() * angular.sin() * lat1.cos())
        .atan2(angular.cos() - lat1.sin() * lat2.sin());

    let mut lng2 = origin.longitude + dlng.to_degrees();
    if !(-180.0..180.0).contains(&lng2) {
        lng2 = (lng2 + 540.0).rem_euclid(360.0) - 180.0;
    }

    Coordinate::with_altitude(lat2.to_degrees(), lng2, origin.altitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_round_trips_distance_and_bearing() {
        let origin = Coordinate::new(40.7128, -74.0060);
        let moved = project(origin, 250.0, 63.0);

        assert!((distance(origin, moved) - 250.0).abs() < 1e-6);
        assert!((bearing(origin, moved) - 63.0).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111_194.93).abs() < 0.1);
    }

    #[test]
    fn bearing_points_due_west() {
        let b = bearing(Coordinate::new(10.0, 5.0), Coordinate::new(10.0, 4.0));
        assert!((b - 270.0).abs() < 0.1);
    }

    #[test]
    fn zero_distance_projection_stays_put() {
        let origin = Coordinate::with_altitude(-33.86, 151.21, 12.0);
        let same = project(origin, 0.0, 145.0);
        assert!(distance(origin, same) < 1e-9);
        assert_eq!(same, origin);
        assert_eq!(same.altitude, 12.0);
    }

    #[test]
    fn in_range_longitude_is_not_rewrapped() {
        let origin = Coordinate::new(-33.86, 151.21);
        let moved = project(origin, 1e-7, 0.0);
        assert_eq!(moved.longitude, 151.21);
    }

    #[test]
    fn crossing_the_antimeridian_wraps() {
        let origin = Coordinate::new(0.0, 179.9999);
        let moved = project(origin, 1_000.0, 90.0);
        assert!(moved.longitude < -179.0);
        assert!((distance(origin, moved) - 1_000.0).abs() < 1e-6);
    }
}
