//! Straight-line walking strategy

use super::{StepCallback, WalkStrategy};
use crate::client::{Acknowledgement, PositionClient};
use crate::common::types::Coordinate;
use crate::common::WalkError;
use crate::events::WalkEvents;
use crate::navigation::controller::{approach_speed, kmh_to_mps, WAYPOINT_REACHED_DISTANCE};
use crate::navigation::geometry;
use crate::navigation::stride::randomize_step_length;
use crate::session::Session;
use async_trait::async_trait;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Walks directly at the target without routing, used when directions are unavailable
pub struct StraightLineStrategy {
    client: Arc<dyn PositionClient>,
    events: Arc<dyn WalkEvents>,
    current_walking_speed: f64,
    rng: SmallRng,
}

impl StraightLineStrategy {
    pub fn new(client: Arc<dyn PositionClient>, events: Arc<dyn WalkEvents>) -> Self {
        StraightLineStrategy {
            client,
            events,
            current_walking_speed: 0.0,
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }
}

#[async_trait]
impl WalkStrategy for StraightLineStrategy {
    fn name(&self) -> &str {
        "StraightLineStrategy"
    }

    async fn walk(
        &mut self,
        target: Coordinate,
        mut callback: Option<&mut dyn StepCallback>,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<Option<Acknowledgement>, WalkError> {
        let settings = session.settings();
        if self.current_walking_speed <= 0.0 {
            self.current_walking_speed = settings.walking_speed_kmh;
        }
        info!("Walking in a straight line to {}", target);

        let mut current = self.client.current_position();
        let mut acknowledgement = None;
        let mut sent_at: Option<Instant> = None;

        while geometry::distance(current, target) >= WAYPOINT_REACHED_DISTANCE {
            if cancel.is_cancelled() {
                return Err(WalkError::Cancelled);
            }
            if settings.use_walking_speed_variant {
                self.current_walking_speed = session.variant_speed(self.current_walking_speed);
            }

            let remaining = geometry::distance(current, target);
            let speed = approach_speed(kmh_to_mps(self.current_walking_speed), remaining);
            // One second of travel before the first acknowledgement arrives
            let elapsed = sent_at.map_or(1.0, |sent| sent.elapsed().as_secs_f64());
            let stride = randomize_step_length(&mut self.rng, settings.default_step_length);
            let step = remaining.min(stride.max(elapsed * speed));
            let bearing = geometry::bearing(current, target);
            let next = geometry::project(current, step, bearing);
            debug!(
                "Straight step of {:.2}m bearing {:.2}, {:.2}m remaining",
                step, bearing, remaining
            );

            sent_at = Some(Instant::now());
            acknowledgement = Some(
                self.client
                    .update_position(next.latitude, next.longitude, next.altitude)
                    .await?,
            );
            self.events.position_changed(next.latitude, next.longitude);

            if let Some(callback) = callback.as_mut() {
                callback.on_step().await.map_err(WalkError::Callback)?;
            }

            current = self.client.current_position();
        }

        Ok(acknowledgement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SimulatedClient;
    use crate::config::WalkSettings;
    use crate::events::ChannelEvents;
    use crate::navigation::planner::StraightLinePlanner;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn strategy(client: &Arc<SimulatedClient>) -> StraightLineStrategy {
        let (tx, _rx) = mpsc::unbounded_channel();
        StraightLineStrategy::new(client.clone(), Arc::new(ChannelEvents::new(tx))).with_seed(4)
    }

    fn session() -> Session {
        let settings = WalkSettings {
            walking_speed_kmh: 18.0,
            use_walking_speed_variant: true,
            ..WalkSettings::default()
        };
        Session::new(settings, Arc::new(StraightLinePlanner)).with_seed(8)
    }

    #[tokio::test(start_paused = true)]
    async fn reaches_the_target() {
        let start = Coordinate::new(-37.8136, 144.9631);
        let target = geometry::project(start, 120.0, 200.0);
        let client = Arc::new(SimulatedClient::new(start, Duration::from_millis(800)));

        let ack = strategy(&client)
            .walk(target, None, &session(), &CancellationToken::new())
            .await
            .unwrap()
            .expect("at least one update");

        assert!(geometry::distance(ack.position, target) < WAYPOINT_REACHED_DISTANCE);
        let updates = client.updates();
        assert!(updates.len() > 1);
        for pair in updates.windows(2) {
            assert!(geometry::distance(pair[1], target) < geometry::distance(pair[0], target));
        }
    }

    #[tokio::test]
    async fn already_there_sends_nothing() {
        let start = Coordinate::new(1.0, 1.0);
        let client = Arc::new(SimulatedClient::new(start, Duration::ZERO));

        let ack = strategy(&client)
            .walk(start, None, &session(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(ack.is_none());
        assert_eq!(client.update_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_token_aborts_immediately() {
        let start = Coordinate::new(1.0, 1.0);
        let client = Arc::new(SimulatedClient::new(start, Duration::ZERO));
        let token = CancellationToken::new();
        token.cancel();

        let result = strategy(&client)
            .walk(geometry::project(start, 50.0, 0.0), None, &session(), &token)
            .await;

        assert!(matches!(result, Err(WalkError::Cancelled)));
        assert_eq!(client.update_count(), 0);
    }
}
