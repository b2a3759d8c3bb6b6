//! UseCase layer: one use case per protocol operation.
//!
//! Each use case depends only on the domain interfaces (`RoomRegistry`,
//! `MessagePusher`, `CodeSandbox`); the UI layer wires the concrete
//! implementations in and converts between DTOs and domain models.

pub mod add_comment;
pub mod change_language;
pub mod disconnect_participant;
pub mod error;
pub mod execute_code;
pub mod join_room;
pub mod relay_code;
pub mod send_chat;

pub use add_comment::AddCommentUseCase;
pub use change_language::ChangeLanguageUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::SendChatError;
pub use execute_code::ExecuteCodeUseCase;
pub use join_room::JoinRoomUseCase;
pub use relay_code::RelayCodeUseCase;
pub use send_chat::SendChatUseCase;
