use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors raised while starting or stopping the inventory system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to start item store: {0}")]
    Startup(#[from] FrameworkError),
    #[error("Actor task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
