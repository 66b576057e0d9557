use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during item store operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item rejected: {0}")]
    Rejected(String),
    #[error("Item storage error: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ItemError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ItemError::NotFound(id),
            FrameworkError::Rejected(msg) => ItemError::Rejected(msg),
            FrameworkError::Persistence(msg) => ItemError::Persistence(msg),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                ItemError::ActorCommunicationError(err.to_string())
            }
        }
    }
}
