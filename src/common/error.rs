//! Error types shared by the walking strategies

use crate::client::ClientError;
use crate::navigation::planner::RoutingError;

/// Why a walk did not complete
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("walk cancelled")]
    Cancelled,

    #[error("position update failed: {0}")]
    Client(#[from] ClientError),

    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Callback(anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl WalkError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WalkError::Cancelled)
    }
}
