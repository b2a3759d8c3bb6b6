//! UseCase: 共有バッファの中継処理
//!
//! - code-change: 送信者を除く Room の全メンバーへ中継
//! - sync-code: 新規参加者ひとりに現在のバッファを届ける（宛先は接続ひとつ）
//!
//! サーバーはバッファを保持しません。各送信者が生成した最新の全文を
//! そのまま中継するだけで、競合の調停は行いません（last-write-wins）。

use std::sync::Arc;

use crate::domain::{MessagePushError, MessagePusher, RoomId, RoomRegistry, SocketId};

/// バッファ中継のユースケース
pub struct RelayCodeUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayCodeUseCase {
    /// 新しい RelayCodeUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// code-change を送信者以外の Room メンバーにブロードキャスト
    pub async fn broadcast_change(
        &self,
        room_id: &RoomId,
        sender: &SocketId,
        message: &str,
    ) -> Result<(), String> {
        let targets: Vec<SocketId> = self
            .registry
            .members_of(room_id)
            .await
            .into_iter()
            .map(|p| p.socket_id)
            .filter(|id| id != sender)
            .collect();

        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// 現在のバッファを指定された接続ひとつに送る（ブロードキャストしない）
    pub async fn sync_to(
        &self,
        target: &SocketId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(target, message).await
    }
}
