//! UseCase: インラインコメントの中継処理
//!
//! コメントは送信者を含む Room の全メンバーにブロードキャストされます。
//! 送信者が自分のコメントを受信し直すのは意図された echo で、クライアント側の
//! 受理確認に使われます。サーバーはコメント履歴を保持せず、id の重複排除も
//! 行いません（各クライアントのローカル責務）。

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomId, RoomRegistry, SocketId};

/// コメント中継のユースケース
pub struct AddCommentUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl AddCommentUseCase {
    /// 新しい AddCommentUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// コメントを Room の全メンバー（送信者を含む）にブロードキャスト
    pub async fn execute(&self, room_id: &RoomId, message: &str) -> Result<(), String> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Participant, SocketIdFactory, Timestamp, Username};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::registry::InMemoryRoomRegistry;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn participant(username: &str) -> Participant {
        Participant::new(
            SocketIdFactory::generate(),
            Username::new(username.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_comment_broadcast_includes_sender() {
        // テスト項目: add-comment が送信者自身を含む全メンバーに届く（意図された echo）
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = AddCommentUseCase::new(registry.clone(), pusher.clone());

        let alice = participant("alice");
        let bob = participant("bob");
        let (tx_a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
        pusher.register_client(alice.socket_id.clone(), tx_a).await;
        pusher.register_client(bob.socket_id.clone(), tx_b).await;
        registry.join(room("r1"), alice.clone()).await;
        registry.join(room("r1"), bob.clone()).await;

        // when (操作): alice がコメントを送信
        usecase
            .execute(&room("r1"), r#"{"type":"add-comment"}"#)
            .await
            .unwrap();

        // then (期待する結果): 送信者 alice も自分のコメントを受信する
        assert_eq!(rx_a.try_recv().unwrap(), r#"{"type":"add-comment"}"#);
        assert_eq!(rx_b.try_recv().unwrap(), r#"{"type":"add-comment"}"#);
    }

    #[tokio::test]
    async fn test_comment_to_unknown_room_is_noop() {
        // テスト項目: 未知の Room へのコメントは誰にも届かない（エラーにもならない）
        // given (前提条件):
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = AddCommentUseCase::new(registry, pusher);

        // when (操作):
        let result = usecase
            .execute(&room("nonexistent"), r#"{"type":"add-comment"}"#)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
