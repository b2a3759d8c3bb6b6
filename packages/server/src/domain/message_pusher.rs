//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）に対するドメイン層のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::SocketId;

/// Channel used to push serialized messages to one connection
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// Fire-and-forget, at-most-once delivery: there is no acknowledgment and a
/// broadcast tolerates individual targets failing or having vanished.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a newly connected client.
    async fn register_client(&self, socket_id: SocketId, sender: PusherChannel);

    /// Unregister a disconnected client.
    async fn unregister_client(&self, socket_id: &SocketId);

    /// Push a message to exactly one client.
    async fn push_to(&self, socket_id: &SocketId, content: &str) -> Result<(), MessagePushError>;

    /// Push a message to every target. Individual failures are tolerated.
    async fn broadcast(
        &self,
        targets: Vec<SocketId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
