//! UseCase-level error types.

use thiserror::Error;

/// Errors raised by SendChatUseCase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendChatError {
    /// The sending connection has not joined any room; the chat line is
    /// dropped (transport errors never tear down the connection)
    #[error("sender is not a member of any room")]
    NotInARoom,
}
