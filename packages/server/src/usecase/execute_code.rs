//! UseCase: コード実行のディスパッチ処理（Execution Dispatcher）
//!
//! execute-code イベントを Sandbox の呼び出しに橋渡しし、Room への
//! code-execution-result ブロードキャスト（リクエストごとに正確に 1 回）に
//! つなげます。呼び出し側（UI 層）はこのユースケースを独立したタスクとして
//! spawn し、他の Room のイベント処理を止めないようにします。
//!
//! 同一 Room への並行リクエストは直列化しません。各リクエストが独立に実行
//! され、それぞれ自分の結果をブロードキャストします。実行途中で参加者が
//! 退出しても実行は中断されず、結果は残っているメンバーに配信されます。

use std::sync::Arc;

use crate::domain::{CodeSandbox, ExecutionOutcome, MessagePusher, RoomId, RoomRegistry, SocketId};

/// コード実行ディスパッチのユースケース
pub struct ExecuteCodeUseCase {
    /// Registry（メンバーシップの唯一の真実の情報源）
    registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Sandbox（隔離実行の抽象化）
    sandbox: Arc<dyn CodeSandbox>,
}

impl ExecuteCodeUseCase {
    /// 新しい ExecuteCodeUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        sandbox: Arc<dyn CodeSandbox>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            sandbox,
        }
    }

    /// Sandbox でコードを実行し、結果の配信対象を計算する
    ///
    /// Sandbox は失敗しても正常な戻り値を返す契約なので、このメソッドは
    /// 常に結果とその配信対象を返します。配信対象は実行完了「後」の Room
    /// メンバーです（実行中に退出した参加者には届きません）。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        code: &str,
        language: &str,
    ) -> (ExecutionOutcome, Vec<SocketId>) {
        tracing::info!(
            "Executing {} code for room '{}'",
            language,
            room_id.as_str()
        );

        let outcome = self.sandbox.run(code, language).await;

        let targets: Vec<SocketId> = self
            .registry
            .members_of(room_id)
            .await
            .into_iter()
            .map(|p| p.socket_id)
            .collect();

        (outcome, targets)
    }

    /// code-execution-result を Room の全メンバーにブロードキャスト
    pub async fn broadcast_result(
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
