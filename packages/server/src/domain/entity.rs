//! ドメインエンティティ
//!
//! Room は接続中の参加者の集合のみを保持します。共有バッファ・コメント・
//! チャット履歴はサーバー側に保存されません（クライアント側のローカル状態）。

use super::value_object::{RoomId, SocketId, Timestamp, Username};

/// One live connection with an associated display name
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub socket_id: SocketId,
    pub username: Username,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(socket_id: SocketId, username: Username, connected_at: Timestamp) -> Self {
        Self {
            socket_id,
            username,
            connected_at,
        }
    }
}

/// A named collaboration session grouping a set of live participants.
///
/// Created implicitly on first join, destroyed implicitly when the last
/// participant leaves.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            created_at,
        }
    }

    /// Add a participant. No capacity limit and no duplicate-name rejection;
    /// two participants may share a display name.
    pub fn add_participant(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    /// Remove the participant with the given socket id. Removing an unknown
    /// socket id is a no-op returning `None`.
    pub fn remove_participant(&mut self, socket_id: &SocketId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.socket_id == socket_id)?;
        Some(self.participants.remove(index))
    }

    pub fn contains(&self, socket_id: &SocketId) -> bool {
        self.participants.iter().any(|p| &p.socket_id == socket_id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
