//! Domain layer: entities, value objects and the interfaces the rest of the
//! system is built against.
//!
//! The domain owns the `RoomRegistry`, `MessagePusher` and `CodeSandbox`
//! traits; the infrastructure layer provides the implementations.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod registry;
pub mod sandbox;
pub mod value_object;

pub use entity::{Participant, Room};
pub use error::{MessagePushError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::RoomRegistry;
pub use sandbox::{CodeSandbox, ExecutionOutcome};
pub use value_object::{RoomId, SocketId, SocketIdFactory, Timestamp, Username};

#[cfg(test)]
pub use sandbox::MockCodeSandbox;
