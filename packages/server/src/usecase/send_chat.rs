//! UseCase: チャットメッセージ送信処理
//!
//! チャットの宛先 Room はペイロードではなく、送信者が現在所属している Room
//! から解決します。送信者を含む全メンバーにブロードキャストされます。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, SocketId};

use super::error::SendChatError;

/// チャット送信のユースケース
pub struct SendChatUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendChatUseCase {
    /// 新しい SendChatUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// チャットメッセージを送信者の Room の全メンバーにブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(room_id)` - 配信先の Room
    /// * `Err(SendChatError::NotInARoom)` - 送信者がどの Room にも所属していない
    pub async fn execute(
        &self,
        sender: &SocketId,
        message: &str,
    ) -> Result<RoomId, SendChatError> {
        let room_id = self
            .registry
            .room_of(sender)
            .await
            .ok_or(SendChatError::NotInARoom)?;

        let targets: Vec<SocketId> = self
            .registry
            .members_of(&room_id)
            .await
            .into_iter()
            .map(|p| p.socket_id)
            .collect();

        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast chat message: {}", e);
        }

        Ok(room_id)
    }
}
