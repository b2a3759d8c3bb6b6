//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRegistry};
use crate::usecase::{
    AddCommentUseCase, ChangeLanguageUseCase, DisconnectParticipantUseCase, ExecuteCodeUseCase,
    JoinRoomUseCase, RelayCodeUseCase, SendChatUseCase,
};

/// Shared application state
pub struct AppState {
    /// Registry（メンバーシップの唯一の真実の情報源、HTTP の読み取り系で使用）
    pub registry: Arc<dyn RoomRegistry>,
    /// MessagePusher（接続時の送信チャンネル登録で使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// RelayCodeUseCase（バッファ中継のユースケース）
    pub relay_code_usecase: Arc<RelayCodeUseCase>,
    /// AddCommentUseCase（コメント中継のユースケース）
    pub add_comment_usecase: Arc<AddCommentUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    pub send_chat_usecase: Arc<SendChatUseCase>,
    /// ChangeLanguageUseCase（言語切り替え通知のユースケース）
    pub change_language_usecase: Arc<ChangeLanguageUseCase>,
    /// ExecuteCodeUseCase（コード実行ディスパッチのユースケース）
    pub execute_code_usecase: Arc<ExecuteCodeUseCase>,
}
