//! WebSocket event DTOs.
//!
//! Wire format: JSON text messages tagged with a kebab-case `type` field and
//! camelCase payload keys. Inbound client events deserialize into one tagged
//! enum; outbound messages are one struct per message carrying an explicit
//! `r#type` discriminant.

use serde::{Deserialize, Serialize};

/// Inline comment payload, relayed verbatim.
///
/// The id is a client-generated timestamp-derived token; the server never
/// deduplicates it (that is each client's local responsibility).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub line_number: u32,
    pub comment: String,
    pub user: String,
}

/// Events received from clients
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "join", rename_all = "camelCase")]
    Join { room_id: String, username: String },

    #[serde(rename = "code-change", rename_all = "camelCase")]
    CodeChange { room_id: String, code: String },

    /// Targeted buffer sync: an existing member pushes the current buffer
    /// to exactly one newly joined connection
    #[serde(rename = "sync-code", rename_all = "camelCase")]
    SyncCode { socket_id: String, code: String },

    #[serde(rename = "add-comment", rename_all = "camelCase")]
    AddComment { room_id: String, comment: CommentDto },

    #[serde(rename = "chat-message")]
    ChatMessage { username: String, message: String },

    #[serde(rename = "language-change", rename_all = "camelCase")]
    LanguageChange { room_id: String, new_language: String },

    #[serde(rename = "execute-code", rename_all = "camelCase")]
    ExecuteCode {
        room_id: String,
        code: String,
        language: String,
    },
}

/// Message type discriminant for outbound messages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "joined")]
    Joined,
    #[serde(rename = "disconnected")]
    Disconnected,
    #[serde(rename = "code-change")]
    CodeChange,
    #[serde(rename = "add-comment")]
    AddComment,
    #[serde(rename = "chat-message")]
    ChatMessage,
    #[serde(rename = "language-change")]
    LanguageChange,
    #[serde(rename = "code-execution-result")]
    CodeExecutionResult,
}

/// One member entry in the joined broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub socket_id: String,
    pub username: String,
}

/// Broadcast to every member (joiner included) when a participant joins;
/// carries the full current member list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMessage {
    pub r#type: MessageType,
    pub clients: Vec<ClientInfo>,
    pub username: String,
    pub socket_id: String,
}

/// Broadcast to the remaining members when a connection closes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedMessage {
    pub r#type: MessageType,
    pub socket_id: String,
    pub username: String,
}

/// Buffer update relayed to peers (also the payload of a targeted sync)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChangeMessage {
    pub r#type: MessageType,
    pub code: String,
}

/// Comment relayed to the whole room, sender included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentMessage {
    pub r#type: MessageType,
    pub comment: CommentDto,
}

/// Chat line relayed to the whole room, sender included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBroadcastMessage {
    pub r#type: MessageType,
    pub username: String,
    pub message: String,
}

/// Language switch relayed to peers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageChangeMessage {
    pub r#type: MessageType,
    pub new_language: String,
}

/// Execution result broadcast to the whole room, exactly once per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeExecutionResultMessage {
    pub r#type: MessageType,
    pub result: String,
    pub success: bool,
}
