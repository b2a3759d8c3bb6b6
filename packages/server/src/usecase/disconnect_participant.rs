//! UseCase: 参加者切断処理
//!
//! トランスポート層の close 通知（明示的な leave がない突然の切断を含む）を
//! 受けて、参加者を Registry から取り除き、残りのメンバーへの通知対象を
//! 計算します。二重切断や join していない接続の切断は no-op です。

use std::sync::Arc;

use crate::domain::{MessagePusher, Participant, RoomId, RoomRegistry, SocketId};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Arguments
    ///
    /// * `socket_id` - 切断した接続の ID（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Some((room_id, participant, notify_targets))` - 所属していた Room、
    ///   削除された参加者、および通知対象（残りのメンバー）
    /// * `None` - どの Room にも所属していなかった（no-op、エラーではない）
    pub async fn execute(
        &self,
        socket_id: &SocketId,
    ) -> Option<(RoomId, Participant, Vec<SocketId>)> {
        // 送信チャンネルの登録解除は所属の有無にかかわらず行う
        self.message_pusher.unregister_client(socket_id).await;

        let (room_id, participant) = self.registry.leave(socket_id).await?;

        // 通知対象: 退出後に Room に残っている全メンバー
        let notify_targets: Vec<SocketId> = self
            .registry
            .members_of(&room_id)
            .await
            .into_iter()
            .map(|p| p.socket_id)
            .collect();

        Some((room_id, participant, notify_targets))
    }

    /// disconnected を残りのメンバーにブロードキャスト
    pub async fn broadcast_disconnected(
        &self,
        targets: Vec<SocketId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
