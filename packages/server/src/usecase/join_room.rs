//! UseCase: 参加者の Room への参加処理
//!
//! Room は最初の join で暗黙的に作成されます。人数制限も表示名の重複チェックも
//! 行いません（同じ表示名の参加者が共存できます）。

use std::sync::Arc;

use kyodo_shared::time::get_timestamp_millis;

use crate::domain::{
    MessagePusher, Participant, RoomId, RoomRegistry, SocketId, Timestamp, Username,
};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Room への参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加先の Room ID（Domain Model）
    /// * `username` - 参加者の表示名（Domain Model）
    /// * `socket_id` - トランスポート層が生成した接続 ID（Domain Model）
    ///
    /// # Returns
    ///
    /// 参加後の Room の全メンバー（joined ブロードキャストのペイロード構築に使う）
    pub async fn execute(
        &self,
        room_id: RoomId,
        username: Username,
        socket_id: SocketId,
    ) -> Vec<Participant> {
        let connected_at = Timestamp::new(get_timestamp_millis());
        let participant = Participant::new(socket_id, username, connected_at);

        self.registry.join(room_id.clone(), participant).await;

        self.registry.members_of(&room_id).await
    }

    /// joined を Room の全メンバー（参加者自身を含む）にブロードキャスト
    ///
    /// 参加者自身も自分の join を受信します（全員が同じ最新メンバーリストを
    /// 受け取るため）。
    pub async fn broadcast_joined(&self, room_id: &RoomId, message: &str) -> Result<(), String> {
        let targets: Vec<SocketId> = self
            .registry
            .members_of(room_id)
            .await
            .into_iter()
            .map(|p| p.socket_id)
            .collect();

        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
