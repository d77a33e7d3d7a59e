//! Human-like walking between coordinates
//!
//! A walk turns a routed path into many short, randomized position updates sent to a
//! location service, correcting each step for the latency observed on the previous one.
pub mod client;
pub mod common;
pub mod config;
pub mod events;
pub mod navigation;
pub mod session;

pub use crate::client::{Acknowledgement, PositionClient};
pub use crate::common::types::Coordinate;
pub use crate::common::WalkError;
pub use crate::config::WalkSettings;
pub use crate::events::{PathEvent, WalkEvent, WalkEvents};
pub use crate::navigation::{RoutedStrategy, StepCallback, WalkStrategy};
pub use crate::session::Session;
