//! Movement feedback controller
//!
//! Drives the reported position along a filtered waypoint list one short step at a time.
//! After every update the controller re-reads the authoritative position, measures how far
//! and how fast the last step really went, and folds any shortfall into the next step.

use super::geometry;
use super::strategy::StepCallback;
use super::stride::randomize_step_length;
use crate::client::{Acknowledgement, PositionClient};
use crate::common::types::Coordinate;
use crate::common::WalkError;
use crate::events::WalkEvents;
use crate::session::Session;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Remaining distance to the target under which stepping stops, meters
pub const ARRIVAL_DISTANCE: f64 = 10.0;
/// Observed distance under which a waypoint counts as reached, meters
pub const WAYPOINT_REACHED_DISTANCE: f64 = 2.0;
/// Distance to the target under which the walker slows down, meters
pub const SLOW_DOWN_DISTANCE: f64 = 40.0;
/// Approach speed near the target, m/s (10 km/h)
pub const SLOW_DOWN_SPEED: f64 = 10.0 / 3.6;

pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Cap `speed` at the approach speed once the target is close
pub fn approach_speed(speed: f64, distance_to_target: f64) -> f64 {
    if distance_to_target < SLOW_DOWN_DISTANCE && speed > SLOW_DOWN_SPEED {
        SLOW_DOWN_SPEED
    } else {
        speed
    }
}

/// The next step to issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub next: Coordinate,
    pub bearing: f64,
    /// Planned step length, meters
    pub distance: f64,
    /// Planned speed, m/s
    pub speed: f64,
}

impl StepPlan {
    /// Plan a step of `distance` meters from `origin` heading at `toward`
    pub fn toward(origin: Coordinate, toward: Coordinate, distance: f64, speed: f64) -> Self {
        let bearing = geometry::bearing(origin, toward);
        StepPlan {
            next: geometry::project(origin, distance, bearing),
            bearing,
            distance,
            speed,
        }
    }
}

/// What was observed after a step was sent
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    /// Observed position when the step was sent
    pub previous: Coordinate,
    /// Observed position now
    pub current: Coordinate,
    /// Wall-clock time since the step was sent
    pub elapsed: Duration,
}

/// Speed and distance the last step fell short by
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drift {
    pub speed_raise: f64,
    pub distance_raise: f64,
}

impl Drift {
    pub fn measure(plan: &StepPlan, measurement: &Measurement) -> Self {
        let actual_speed = plan.distance / measurement.elapsed.as_secs_f64();
        let actual_distance = geometry::distance(measurement.previous, measurement.current);

        let mut drift = Drift::default();
        if actual_speed < plan.speed {
            drift.speed_raise = plan.speed - actual_speed;
        }
        if actual_distance < plan.distance {
            drift.distance_raise = plan.distance - actual_distance;
        }
        debug!(
            "Actual/expected speed: {:.2}/{:.2}m/s, actual/expected distance: {:.2}/{:.2}m, raise by {:.2}m/s and {:.2}m",
            actual_speed,
            plan.speed,
            actual_distance,
            plan.distance,
            drift.speed_raise,
            drift.distance_raise
        );
        drift
    }
}

/// Result of driving a path
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Last acknowledgement received, `None` when the path was empty
    pub acknowledgement: Option<Acknowledgement>,
    /// Every coordinate sent, in order
    pub walked: Vec<Coordinate>,
}

/// Closed-loop step controller for one agent
pub struct FeedbackController {
    client: Arc<dyn PositionClient>,
    events: Arc<dyn WalkEvents>,
    /// Smoothed walking speed in km/h, zero until the first walk sets it
    current_walking_speed: f64,
    rng: SmallRng,
}

impl FeedbackController {
    /// Create a new controller
    pub fn new(client: Arc<dyn PositionClient>, events: Arc<dyn WalkEvents>) -> Self {
        FeedbackController {
            client,
            events,
            current_walking_speed: 0.0,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Use a fixed seed for step randomization
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Randomized step length around `base`
    pub fn stride(&mut self, base: f64) -> f64 {
        randomize_step_length(&mut self.rng, base)
    }

    /// Current smoothed walking speed, km/h
    pub fn current_walking_speed(&self) -> f64 {
        self.current_walking_speed
    }

    /// Walk through every point of `path`, the last one being the target.
    ///
    /// Stops early once a step starts within [`ARRIVAL_DISTANCE`] of `target`.
    pub async fn drive(
        &mut self,
        path: &[Coordinate],
        target: Coordinate,
        mut callback: Option<&mut dyn StepCallback>,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<WalkOutcome, WalkError> {
        let step_length = session.settings().default_step_length;
        let mut walked = Vec::new();
        let mut acknowledgement = None;

        for &waypoint in path {
            if cancel.is_cancelled() {
                return Err(WalkError::Cancelled);
            }
            debug!("Leading to the next waypoint: {}", waypoint);

            let mut current = self.client.current_position();
            let speed = approach_speed(
                kmh_to_mps(self.refresh_speed(session)),
                geometry::distance(current, target),
            );
            // First step covers at least one second of travel
            let distance = self.stride(step_length).max(speed);
            let mut plan = StepPlan::toward(current, waypoint, distance, speed);
            debug!(
                "Distance to walk in the next position update: {:.2}m bearing: {:.2}",
                plan.distance, plan.bearing
            );

            let mut previous = current;
            let mut sent_at = Instant::now();
            acknowledgement = Some(self.send(plan.next, &mut walked).await?);

            let remaining = geometry::distance(current, target);
            debug!("Real remaining distance to target: {:.2}m", remaining);
            if remaining < ARRIVAL_DISTANCE {
                info!("Within {:.2}m of the target, stopping", remaining);
                break;
            }

            loop {
                if cancel.is_cancelled() {
                    return Err(WalkError::Cancelled);
                }

                let elapsed = sent_at.elapsed();
                current = self.client.current_position();
                let measurement = Measurement {
                    previous,
                    current,
                    elapsed,
                };
                plan = self.replan(&plan, &measurement, waypoint, target, session);

                previous = current;
                sent_at = Instant::now();
                acknowledgement = Some(self.send(plan.next, &mut walked).await?);
                self.events.position_changed(plan.next.latitude, plan.next.longitude);

                if let Some(callback) = callback.as_mut() {
                    callback.on_step().await.map_err(WalkError::Callback)?;
                }

                if geometry::distance(current, waypoint) < WAYPOINT_REACHED_DISTANCE {
                    break;
                }
            }

            self.events.position_changed(waypoint.latitude, waypoint.longitude);
        }

        Ok(WalkOutcome {
            acknowledgement,
            walked,
        })
    }

    /// Plan the step that follows `previous` given what was observed after sending it
    pub fn replan(
        &mut self,
        previous: &StepPlan,
        measurement: &Measurement,
        waypoint: Coordinate,
        target: Coordinate,
        session: &Session,
    ) -> StepPlan {
        let settings = session.settings();
        let current = measurement.current;
        let to_waypoint = geometry::distance(current, waypoint);
        let to_target = geometry::distance(current, target);
        let elapsed = measurement.elapsed.as_secs_f64();
        debug!(
            "Actual position: {}, reached in {:.2}ms, distance from the next waypoint: {:.3}m, distance from the target: {:.3}m",
            current,
            elapsed * 1000.0,
            to_waypoint,
            to_target
        );

        let drift = Drift::measure(previous, measurement);

        let mut speed = previous.speed;
        if settings.use_walking_speed_variant {
            self.current_walking_speed = session.variant_speed(self.current_walking_speed);
            speed = kmh_to_mps(self.current_walking_speed);
        }
        speed = approach_speed(speed + drift.speed_raise, to_target);

        // Never step past the nearer of the waypoint and the target
        let stride = self.stride(settings.default_step_length);
        let catch_up = (stride + drift.distance_raise).max(elapsed * speed) + drift.distance_raise;
        let distance = to_target.min(to_waypoint).min(catch_up);

        let plan = StepPlan::toward(current, waypoint, distance, speed);
        debug!(
            "Distance to walk in the next position update: {:.2}, bearing: {:.2}, speed: {:.2}",
            plan.distance, plan.bearing, plan.speed
        );
        plan
    }

    fn refresh_speed(&mut self, session: &Session) -> f64 {
        let settings = session.settings();
        if self.current_walking_speed <= 0.0 {
            self.current_walking_speed = settings.walking_speed_kmh;
        }
        if settings.use_walking_speed_variant {
            self.current_walking_speed = session.variant_speed(self.current_walking_speed);
        }
        self.current_walking_speed
    }

    async fn send(
        &self,
        next: Coordinate,
        walked: &mut Vec<Coordinate>,
    ) -> Result<Acknowledgement, WalkError> {
        walked.push(next);
        let ack = self
            .client
            .update_position(next.latitude, next.longitude, next.altitude)
            .await?;
        Ok(ack)
    }
}
