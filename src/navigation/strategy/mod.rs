//! Walking strategies

use crate::client::Acknowledgement;
use crate::common::types::Coordinate;
use crate::common::WalkError;
use crate::session::Session;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub mod routed;
pub mod straight;

pub use routed::RoutedStrategy;
pub use straight::StraightLineStrategy;

/// Work the caller wants done between two steps of a walk
#[async_trait]
pub trait StepCallback: Send {
    /// Called once per issued step, awaited before the next step is planned
    async fn on_step(&mut self) -> anyhow::Result<()>;
}

/// Trait for algorithms that walk the agent to a target
#[async_trait]
pub trait WalkStrategy: Send {
    /// Get the name of this strategy
    fn name(&self) -> &str;

    /// Walk to `target`, returning the last acknowledgement from the location service.
    ///
    /// `None` means no update was needed. Cancellation surfaces as [`WalkError::Cancelled`].
    async fn walk(
        &mut self,
        target: Coordinate,
        callback: Option<&mut dyn StepCallback>,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<Option<Acknowledgement>, WalkError>;
}
