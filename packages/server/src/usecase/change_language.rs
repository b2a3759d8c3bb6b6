//! UseCase: 実行言語の切り替え通知
//!
//! language-change は送信者を除く Room の全メンバーに中継されます。
//! 言語タグの妥当性はここでは検証しません。検証は実行時に Sandbox の
//! 言語テーブルが行い、未知のタグは失敗結果になります。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, SocketId};

/// 言語切り替え通知のユースケース
pub struct ChangeLanguageUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ChangeLanguageUseCase {
    /// 新しい ChangeLanguageUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// language-change を送信者以外の Room メンバーにブロードキャスト
    pub async fn execute(
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
}
