//! Domain-level error types.

use thiserror::Error;

/// Validation errors raised when constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("socket id must not be empty")]
    EmptySocketId,
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Errors raised by MessagePusher implementations
#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
