//! Routed walking strategy
//!
//! Asks the session's routing provider for a path, thins it out and hands it to the
//! feedback controller. When the provider is rate limited the whole walk is delegated to
//! the straight-line strategy instead.

use super::{StepCallback, StraightLineStrategy, WalkStrategy};
use crate::client::{Acknowledgement, PositionClient};
use crate::common::types::Coordinate;
use crate::common::WalkError;
use crate::events::{PathEvent, WalkEvents};
use crate::navigation::controller::FeedbackController;
use crate::navigation::planner::DirectionsProvider;
use crate::navigation::waypoint_filter::filter_waypoints;
use crate::session::Session;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Routed walking strategy for one agent
pub struct RoutedStrategy {
    client: Arc<dyn PositionClient>,
    events: Arc<dyn WalkEvents>,
    controller: FeedbackController,
    directions: Option<Arc<dyn DirectionsProvider>>,
    fallback: Option<Box<dyn WalkStrategy>>,
}

impl RoutedStrategy {
    /// Create a new routed strategy
    pub fn new(client: Arc<dyn PositionClient>, events: Arc<dyn WalkEvents>) -> Self {
        let controller = FeedbackController::new(Arc::clone(&client), Arc::clone(&events));
        RoutedStrategy {
            client,
            events,
            controller,
            directions: None,
            fallback: None,
        }
    }

    /// Replace the feedback controller, e.g. with a seeded one
    pub fn with_controller(mut self, controller: FeedbackController) -> Self {
        self.controller = controller;
        self
    }

    /// Set the strategy used when the routing provider is rate limited
    pub fn with_fallback<T: WalkStrategy + 'static>(mut self, fallback: T) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn controller(&self) -> &FeedbackController {
        &self.controller
    }

    fn directions_service(&mut self, session: &Session) -> Arc<dyn DirectionsProvider> {
        Arc::clone(self.directions.get_or_insert_with(|| session.directions_service()))
    }

    fn fallback(&mut self) -> &mut Box<dyn WalkStrategy> {
        let client = &self.client;
        let events = &self.events;
        self.fallback.get_or_insert_with(|| {
            Box::new(StraightLineStrategy::new(Arc::clone(client), Arc::clone(events)))
        })
    }
}

#[async_trait]
impl WalkStrategy for RoutedStrategy {
    fn name(&self) -> &str {
        "RoutedStrategy"
    }

    async fn walk(
        &mut self,
        target: Coordinate,
        callback: Option<&mut dyn StepCallback>,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<Option<Acknowledgement>, WalkError> {
        let directions_service = self.directions_service(session);
        let current = self.client.current_position();
        let directions = directions_service
            .get_directions(current, &[], target)
            .await?;

        if directions.status.is_over_query_limit() {
            let fallback = self.fallback();
            warn!(
                "Routing provider over query limit, walking with {}",
                fallback.name()
            );
            return fallback.walk(target, callback, session, cancel).await;
        }

        let mut path = directions.waypoints;
        if path.last() != Some(&target) {
            path.push(target);
        }
        let min_spacing = self.controller.stride(session.settings().default_step_length);
        filter_waypoints(&mut path, current, min_spacing);
        info!("Walking to {} through {} waypoints", target, path.len());

        self.events.path(PathEvent::planned(&path));

        let outcome = self
            .controller
            .drive(&path, target, callback, session, cancel)
            .await?;
        debug!("Walk finished after {} position updates", outcome.walked.len());

        self.events.path(PathEvent::walked(&outcome.walked));
        Ok(outcome.acknowledgement)
    }
}
