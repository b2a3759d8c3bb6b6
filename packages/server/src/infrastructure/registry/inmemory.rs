//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! Room マップと socket → room の索引を単一の Mutex で保護し、
//! 並行する join / leave / lookup を直列化します（single-writer discipline）。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kyodo_shared::time::{Clock, SystemClock};

use crate::domain::{Participant, Room, RoomId, RoomRegistry, SocketId, Timestamp};

struct RegistryState {
    rooms: HashMap<RoomId, Room>,
    /// Index resolving which room a connection belongs to
    socket_index: HashMap<SocketId, RoomId>,
}

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a registry with an injected clock (for testing)
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                rooms: HashMap::new(),
                socket_index: HashMap::new(),
            }),
            clock,
        }
    }

    fn remove_from_state(
        state: &mut RegistryState,
        socket_id: &SocketId,
    ) -> Option<(RoomId, Participant)> {
        let room_id = state.socket_index.remove(socket_id)?;
        let room = state.rooms.get_mut(&room_id)?;
        let participant = room.remove_participant(socket_id)?;

        // A room dies with its last participant
        if room.is_empty() {
            state.rooms.remove(&room_id);
        }

        Some((room_id, participant))
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, room_id: RoomId, participant: Participant) {
        let mut state = self.state.lock().await;

        // A participant belongs to exactly one room at a time: re-home a
        // socket that is already a member of another room
        if let Some((previous, _)) = Self::remove_from_state(&mut state, &participant.socket_id) {
            tracing::warn!(
                "Socket '{}' rejoined; moved from room '{}' to room '{}'",
                participant.socket_id.as_str(),
                previous.as_str(),
                room_id.as_str()
            );
        }

        let created_at = Timestamp::new(self.clock.now_millis());
        let room = state
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone(), created_at));
        room.add_participant(participant.clone());
        state
            .socket_index
            .insert(participant.socket_id.clone(), room_id);
    }

    async fn leave(&self, socket_id: &SocketId) -> Option<(RoomId, Participant)> {
        let mut state = self.state.lock().await;
        Self::remove_from_state(&mut state, socket_id)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<Participant> {
        let state = self.state.lock().await;
        state
            .rooms
            .get(room_id)
            .map(|room| room.participants.clone())
            .unwrap_or_default()
    }

    async fn room_of(&self, socket_id: &SocketId) -> Option<RoomId> {
        let state = self.state.lock().await;
        state.socket_index.get(socket_id).cloned()
    }

    async fn rooms(&self) -> Vec<Room> {
        let state = self.state.lock().await;
        state.rooms.values().cloned().collect()
    }
}
