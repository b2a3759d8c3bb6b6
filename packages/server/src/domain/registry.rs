//! Registry trait 定義
//!
//! Room と参加者のマッピングに対するドメイン層のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::{Participant, Room};
use super::value_object::{RoomId, SocketId};

/// Room Registry trait
///
/// Maps room ids to the set of currently connected participants. Rooms are
/// created lazily by the act of joining and destroyed implicitly when the
/// last participant leaves; queries against an unknown room id return empty
/// results, never an error.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Register a participant in a room. The room is created if it does not
    /// exist. A socket that is already a member of another room is moved
    /// (a participant belongs to exactly one room at a time).
    async fn join(&self, room_id: RoomId, participant: Participant);

    /// Remove the participant from whatever room it was in.
    ///
    /// Idempotent: leaving twice, or leaving without having joined, returns
    /// `None` and is not an error. Returns the room id and the removed
    /// participant on success so the caller can notify the remaining members.
    async fn leave(&self, socket_id: &SocketId) -> Option<(RoomId, Participant)>;

    /// Current members of a room. Unknown room ids yield an empty list.
    async fn members_of(&self, room_id: &RoomId) -> Vec<Participant>;

    /// Resolve which room a connection currently belongs to.
    async fn room_of(&self, socket_id: &SocketId) -> Option<RoomId>;

    /// Snapshot of all live rooms (for the HTTP listing endpoint).
    async fn rooms(&self) -> Vec<Room>;
}
