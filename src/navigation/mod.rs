//! Navigation module: geometry, waypoint processing and walking strategies
pub mod controller;
pub mod geometry;
pub mod planner;
pub mod strategy;
pub mod stride;
pub mod waypoint_filter;

pub use self::controller::{FeedbackController, StepPlan, WalkOutcome};
pub use self::planner::{Directions, DirectionsProvider, DirectionsStatus};
pub use self::strategy::{RoutedStrategy, StepCallback, StraightLineStrategy, WalkStrategy};
pub use self::waypoint_filter::filter_waypoints;
