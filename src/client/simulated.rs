//! In-process location service with configurable latency

use super::{Acknowledgement, ClientError, PositionClient};
use crate::common::types::Coordinate;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// A simulated location service
///
/// Every update sleeps for `latency` before it is applied, then becomes the
/// authoritative position. All updates are kept so callers can inspect them.
#[derive(Debug)]
pub struct SimulatedClient {
    latency: Duration,
    state: Mutex<ClientState>,
}

#[derive(Debug)]
struct ClientState {
    position: Coordinate,
    updates: Vec<Coordinate>,
    fail_after: Option<usize>,
}

impl SimulatedClient {
    /// Create a client positioned at `start`
    pub fn new(start: Coordinate, latency: Duration) -> Self {
        SimulatedClient {
            latency,
            state: Mutex::new(ClientState {
                position: start,
                updates: Vec::new(),
                fail_after: None,
            }),
        }
    }

    /// Reject every update once `count` updates have been accepted
    pub fn fail_after(self, count: usize) -> Self {
        self.lock().fail_after = Some(count);
        self
    }

    /// Every position update accepted so far
    pub fn updates(&self) -> Vec<Coordinate> {
        self.lock().updates.clone()
    }

    pub fn update_count(&self) -> usize {
        self.lock().updates.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PositionClient for SimulatedClient {
    async fn update_position(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> Result<Acknowledgement, ClientError> {
        tokio::time::sleep(self.latency).await;

        let mut state = self.lock();
        if let Some(limit) = state.fail_after {
            if state.updates.len() >= limit {
                return Err(ClientError::Transport(format!(
                    "connection lost after {} updates",
                    limit
                )));
            }
        }

        let position = Coordinate::with_altitude(latitude, longitude, altitude);
        state.position = position;
        state.updates.push(position);
        Ok(Acknowledgement {
            position,
            sequence: state.updates.len() as u64,
        })
    }

    fn current_position(&self) -> Coordinate {
        self.lock().position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn applies_updates_after_latency() {
        let client = SimulatedClient::new(Coordinate::new(1.0, 2.0), Duration::from_millis(400));
        let started = tokio::time::Instant::now();

        let ack = client.update_position(1.5, 2.5, 3.0).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(400));
        assert_eq!(ack.sequence, 1);
        assert_eq!(client.current_position(), Coordinate::new(1.5, 2.5));
        assert_eq!(client.update_count(), 1);
    }

    #[tokio::test]
    async fn fails_once_the_limit_is_reached() {
        let client = SimulatedClient::new(Coordinate::new(0.0, 0.0), Duration::ZERO).fail_after(1);

        assert!(client.update_position(0.1, 0.1, 0.0).await.is_ok());
        let err = client.update_position(0.2, 0.2, 0.0).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(client.current_position(), Coordinate::new(0.1, 0.1));
    }
}
