//! Common utilities and types for the walking core
pub mod error;

pub use self::error::WalkError;

/// Common types and utilities used across the codebase
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// A geographic position (degrees, altitude in meters)
    #[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
    pub struct Coordinate {
        pub latitude: f64,
        pub longitude: f64,
        #[serde(default)]
        pub altitude: f64,
    }

    impl Coordinate {
        /// Create a coordinate at ground level
        pub fn new(latitude: f64, longitude: f64) -> Self {
            Coordinate {
                latitude,
                longitude,
                altitude: 0.0,
            }
        }

        /// Create a coordinate with an explicit altitude
        pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> Self {
            Coordinate {
                latitude,
                longitude,
                altitude,
            }
        }
    }

    // Routing providers never report altitude, so two points are the same
    // place when latitude and longitude match exactly.
    impl PartialEq for Coordinate {
        fn eq(&self, other: &Self) -> bool {
            self.latitude == other.latitude && self.longitude == other.longitude
        }
    }

    impl fmt::Display for Coordinate {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{{lat: {}, lng: {}}}", self.latitude, self.longitude)
        }
    }

    /// Render a path the way the path events carry it
    pub fn stringify_path(points: &[Coordinate]) -> String {
        points
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join(",\n")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn equality_ignores_altitude() {
            let ground = Coordinate::new(51.5, -0.12);
            let raised = Coordinate::with_altitude(51.5, -0.12, 35.0);
            assert_eq!(ground, raised);
            assert_ne!(ground, Coordinate::new(51.5, -0.120001));
        }

        #[test]
        fn path_is_joined_per_line() {
            let path = [Coordinate::new(1.5, 2.0), Coordinate::new(-3.0, 4.25)];
            assert_eq!(
                stringify_path(&path),
                "{lat: 1.5, lng: 2},\n{lat: -3, lng: 4.25}"
            );
            assert_eq!(stringify_path(&[]), "");
        }
    }
}
