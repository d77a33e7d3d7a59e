//! Position reporting client
pub mod simulated;

use crate::common::types::Coordinate;
use async_trait::async_trait;

pub use self::simulated::SimulatedClient;

/// Acknowledgement returned by the location service for one position update
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    /// Position the service accepted
    pub position: Coordinate,
    /// Monotonic counter of accepted updates
    pub sequence: u64,
}

/// Failure reported while sending a position update
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("update rejected: {0}")]
    Rejected(String),
}

/// Trait for the service that receives position updates
#[async_trait]
pub trait PositionClient: Send + Sync {
    /// Report a new position, suspends until the service acknowledges it
    async fn update_position(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> Result<Acknowledgement, ClientError>;

    /// Authoritative current position as last observed by the service
    fn current_position(&self) -> Coordinate;
}
