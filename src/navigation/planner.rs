//! Routing providers

use crate::common::types::Coordinate;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Outcome status reported by a routing provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionsStatus {
    Ok,
    /// The provider is rate limiting this client
    OverQueryLimit,
    /// Any other status, treated as success
    Other(String),
}

impl DirectionsStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "OK" => DirectionsStatus::Ok,
            "OVER_QUERY_LIMIT" => DirectionsStatus::OverQueryLimit,
            other => DirectionsStatus::Other(other.to_string()),
        }
    }

    pub fn is_over_query_limit(&self) -> bool {
        matches!(self, DirectionsStatus::OverQueryLimit)
    }
}

/// Candidate path returned by a routing provider
#[derive(Debug, Clone)]
pub struct Directions {
    pub status: DirectionsStatus,
    pub waypoints: Vec<Coordinate>,
}

/// Failure while asking a provider for directions
#[derive(Debug, Clone, thiserror::Error)]
#[error("directions unavailable: {0}")]
pub struct RoutingError(pub String);

/// Trait for routing providers
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Ask for a path from origin to destination through the given via points
    async fn get_directions(
        &self,
        origin: Coordinate,
        via: &[Coordinate],
        destination: Coordinate,
    ) -> Result<Directions, RoutingError>;
}

/// A provider that routes straight through the via points to the destination
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLinePlanner;

#[async_trait]
impl DirectionsProvider for StraightLinePlanner {
    async fn get_directions(
        &self,
        origin: Coordinate,
        via: &[Coordinate],
        destination: Coordinate,
    ) -> Result<Directions, RoutingError> {
        let mut waypoints = Vec::with_capacity(via.len() + 2);
        waypoints.push(origin);
        waypoints.extend_from_slice(via);
        waypoints.push(destination);
        Ok(Directions {
            status: DirectionsStatus::Ok,
            waypoints,
        })
    }
}

/// A provider that always answers with the same directions
#[derive(Debug, Clone)]
pub struct StaticPlanner {
    status: DirectionsStatus,
    waypoints: Vec<Coordinate>,
}

#[derive(Debug, Deserialize)]
struct StaticRoute {
    #[serde(default = "default_status")]
    status: String,
    waypoints: Vec<Coordinate>,
}

fn default_status() -> String {
    "OK".to_string()
}

impl StaticPlanner {
    pub fn new(status: DirectionsStatus, waypoints: Vec<Coordinate>) -> Self {
        StaticPlanner { status, waypoints }
    }

    /// Provider that reports the rate limit on every request
    pub fn over_query_limit() -> Self {
        StaticPlanner::new(DirectionsStatus::OverQueryLimit, Vec::new())
    }

    /// Load a fixed route from JSON: `{"status": "OK", "waypoints": [{"latitude": .., "longitude": ..}]}`
    pub fn from_json(raw: &str) -> Result<Self, RoutingError> {
        let route: StaticRoute =
            serde_json::from_str(raw).map_err(|e| RoutingError(format!("invalid route: {}", e)))?;
        Ok(StaticPlanner::new(
            DirectionsStatus::parse(&route.status),
            route.waypoints,
        ))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RoutingError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RoutingError(format!("cannot read route: {}", e)))?;
        Self::from_json(&raw)
    }
}

#[async_trait]
impl DirectionsProvider for StaticPlanner {
    async fn get_directions(
        &self,
        _origin: Coordinate,
        _via: &[Coordinate],
        _destination: Coordinate,
    ) -> Result<Directions, RoutingError> {
        Ok(Directions {
            status: self.status.clone(),
            waypoints: self.waypoints.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_map_to_variants() {
        assert_eq!(DirectionsStatus::parse("OK"), DirectionsStatus::Ok);
        assert!(DirectionsStatus::parse("OVER_QUERY_LIMIT").is_over_query_limit());
        assert_eq!(
            DirectionsStatus::parse("ZERO_RESULTS"),
            DirectionsStatus::Other("ZERO_RESULTS".to_string())
        );
    }

    #[tokio::test]
    async fn straight_line_includes_endpoints() {
        let origin = Coordinate::new(1.0, 1.0);
        let via = [Coordinate::new(1.5, 1.5)];
        let destination = Coordinate::new(2.0, 2.0);

        let directions = StraightLinePlanner
            .get_directions(origin, &via, destination)
            .await
            .unwrap();

        assert_eq!(directions.waypoints, vec![origin, via[0], destination]);
    }

    #[tokio::test]
    async fn static_route_loads_from_json() {
        let planner = StaticPlanner::from_json(
            r#"{"waypoints": [{"latitude": 1.0, "longitude": 2.0}, {"latitude": 1.1, "longitude": 2.1, "altitude": 4.0}]}"#,
        )
        .unwrap();

        let directions = planner
            .get_directions(Coordinate::default(), &[], Coordinate::default())
            .await
            .unwrap();

        assert_eq!(directions.status, DirectionsStatus::Ok);
        assert_eq!(directions.waypoints.len(), 2);
        assert_eq!(directions.waypoints[1].altitude, 4.0);
    }

    #[test]
    fn malformed_route_is_an_error() {
        assert!(StaticPlanner::from_json("{\"waypoints\": 3}").is_err());
    }
}
