//! Integration tests driving a real in-process server over WebSocket.
//!
//! Each test wires the full dependency graph, binds port 0 and talks to the
//! server with tokio-tungstenite clients, asserting on the actual fan-out
//! each connection observes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use kyodo_server::{
    domain::{CodeSandbox, MessagePusher, RoomRegistry},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
        sandbox::ProcessSandbox,
    },
    ui::{AppState, Server},
    usecase::{
        AddCommentUseCase, ChangeLanguageUseCase, DisconnectParticipantUseCase,
        ExecuteCodeUseCase, JoinRoomUseCase, RelayCodeUseCase, SendChatUseCase,
    },
};

type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Wire the full dependency graph and serve on an ephemeral port.
async fn spawn_server() -> SocketAddr {
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
    let temp_root = std::env::temp_dir().join("kyodo-integration-tests");
    let sandbox: Arc<dyn CodeSandbox> = Arc::new(ProcessSandbox::new(temp_root));

    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let relay_code_usecase = Arc::new(RelayCodeUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let add_comment_usecase = Arc::new(AddCommentUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let change_language_usecase = Arc::new(ChangeLanguageUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let execute_code_usecase = Arc::new(ExecuteCodeUseCase::new(
        registry.clone(),
        message_pusher.clone(),
        sandbox,
    ));

    let server = Server::new(AppState {
        registry,
        message_pusher,
        join_room_usecase,
        disconnect_participant_usecase,
        relay_code_usecase,
        add_comment_usecase,
        send_chat_usecase,
        change_language_usecase,
        execute_code_usecase,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect to test server");
    ws
}

async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send message");
}

async fn recv_json(ws: &mut WsClient) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for a message")
        .expect("Connection closed unexpectedly")
        .expect("WebSocket error");
    match msg {
        Message::Text(text) => serde_json::from_str(&text).expect("Received non-JSON message"),
        other => panic!("Unexpected message kind: {:?}", other),
    }
}

/// Assert the connection receives no text message within the window.
async fn assert_silent(ws: &mut WsClient, window: Duration) {
    match tokio::time::timeout(window, ws.next()).await {
        Err(_) => {}
        Ok(Some(Ok(Message::Text(text)))) => panic!("Expected silence, received: {}", text),
        Ok(_) => {}
    }
}

/// Join a room and return this connection's socket id (from the echoed
/// joined broadcast).
async fn join(ws: &mut WsClient, room_id: &str, username: &str) -> String {
    send_json(ws, json!({"type": "join", "roomId": room_id, "username": username})).await;
    let joined = recv_json(ws).await;
    assert_eq!(joined["type"], "joined");
    assert_eq!(joined["username"], username);
    joined["socketId"]
        .as_str()
        .expect("joined message carries the joiner's socketId")
        .to_string()
}

#[tokio::test]
async fn test_join_broadcasts_full_member_list_to_everyone() {
    // テスト項目: join 時に参加者自身を含む全メンバーが最新のメンバーリストを受信する
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;

    // when (操作):
    let alice_id = join(&mut alice, "room-1", "alice").await;
    let mut bob = connect(addr).await;
    let bob_id = join(&mut bob, "room-1", "bob").await;

    // then (期待する結果): alice も bob の join を受信し、リストは 2 名
    let joined_seen_by_alice = recv_json(&mut alice).await;
    assert_eq!(joined_seen_by_alice["type"], "joined");
    assert_eq!(joined_seen_by_alice["username"], "bob");
    assert_eq!(joined_seen_by_alice["socketId"], bob_id.as_str());
    let clients = joined_seen_by_alice["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 2);
    assert!(clients.iter().any(|c| c["socketId"] == alice_id.as_str()));
    assert!(clients.iter().any(|c| c["socketId"] == bob_id.as_str()));
    assert_ne!(alice_id, bob_id);
}

#[tokio::test]
async fn test_code_change_reaches_peers_but_not_sender() {
    // テスト項目: code-change が送信者以外の各メンバーに 1 回ずつ届く
    // given (前提条件): room のメンバーは {alice, bob, charlie}
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    let mut charlie = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    join(&mut charlie, "room-1", "charlie").await;
    // join のブロードキャストを読み捨てる
    recv_json(&mut alice).await; // bob joined
    recv_json(&mut alice).await; // charlie joined
    recv_json(&mut bob).await; // charlie joined

    // when (操作): alice がバッファを編集
    send_json(
        &mut alice,
        json!({"type": "code-change", "roomId": "room-1", "code": "fn main() {}"}),
    )
    .await;

    // then (期待する結果): bob と charlie は受信、alice は受信しない
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["type"], "code-change");
    assert_eq!(seen_by_bob["code"], "fn main() {}");
    let seen_by_charlie = recv_json(&mut charlie).await;
    assert_eq!(seen_by_charlie["code"], "fn main() {}");
    assert_silent(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_sync_code_is_delivered_only_to_the_target() {
    // テスト項目: sync-code が宛先の接続のみに code-change として届く
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    // alice は bob の join 通知から bob の socketId を知る
    let joined = recv_json(&mut alice).await;
    let bob_id = joined["socketId"].as_str().unwrap().to_string();
    let mut charlie = connect(addr).await;
    join(&mut charlie, "room-1", "charlie").await;
    recv_json(&mut alice).await; // charlie joined
    recv_json(&mut bob).await; // charlie joined

    // when (操作): alice が現在のバッファを bob に同期
    send_json(
        &mut alice,
        json!({"type": "sync-code", "socketId": bob_id, "code": "shared buffer"}),
    )
    .await;

    // then (期待する結果): bob のみ受信
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["type"], "code-change");
    assert_eq!(seen_by_bob["code"], "shared buffer");
    assert_silent(&mut charlie, Duration::from_millis(300)).await;
    assert_silent(&mut alice, Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_comment_broadcast_includes_the_sender() {
    // テスト項目: add-comment が送信者自身にも echo される
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    recv_json(&mut alice).await; // bob joined

    // when (操作):
    send_json(
        &mut alice,
        json!({
            "type": "add-comment",
            "roomId": "room-1",
            "comment": {"id": 1700000000123i64, "lineNumber": 7, "comment": "ここは要確認", "user": "alice"}
        }),
    )
    .await;

    // then (期待する結果): alice と bob の両方が同じコメントを受信する
    let seen_by_alice = recv_json(&mut alice).await;
    assert_eq!(seen_by_alice["type"], "add-comment");
    assert_eq!(seen_by_alice["comment"]["lineNumber"], 7);
    assert_eq!(seen_by_alice["comment"]["user"], "alice");
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["comment"]["id"], 1700000000123i64);
}

#[tokio::test]
async fn test_chat_is_scoped_to_the_senders_room() {
    // テスト項目: chat-message が送信者の Room にのみ届く（Room 分離）
    // given (前提条件): alice は room-1、bob は room-2
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-2", "bob").await;

    // when (操作):
    send_json(
        &mut alice,
        json!({"type": "chat-message", "username": "alice", "message": "hello room 1"}),
    )
    .await;

    // then (期待する結果): alice（送信者を含む Room 全員）は受信、bob は受信しない
    let seen_by_alice = recv_json(&mut alice).await;
    assert_eq!(seen_by_alice["type"], "chat-message");
    assert_eq!(seen_by_alice["message"], "hello room 1");
    assert_silent(&mut bob, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_language_change_reaches_peers_but_not_sender() {
    // テスト項目: language-change が送信者以外に届く
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    recv_json(&mut alice).await; // bob joined

    // when (操作):
    send_json(
        &mut alice,
        json!({"type": "language-change", "roomId": "room-1", "newLanguage": "cpp"}),
    )
    .await;

    // then (期待する結果):
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["type"], "language-change");
    assert_eq!(seen_by_bob["newLanguage"], "cpp");
    assert_silent(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_abrupt_disconnect_notifies_remaining_members() {
    // テスト項目: 明示的な leave なしの切断でも disconnected が残りのメンバーに届く
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    let bob_id = join(&mut bob, "room-1", "bob").await;
    recv_json(&mut alice).await; // bob joined

    // when (操作): bob の接続を突然閉じる
    drop(bob);

    // then (期待する結果): alice に disconnected が届く
    let seen_by_alice = recv_json(&mut alice).await;
    assert_eq!(seen_by_alice["type"], "disconnected");
    assert_eq!(seen_by_alice["socketId"], bob_id.as_str());
    assert_eq!(seen_by_alice["username"], "bob");
}

#[tokio::test]
async fn test_malformed_event_is_dropped_without_killing_the_connection() {
    // テスト項目: 不正なイベントは破棄され、接続はそのまま使い続けられる
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    recv_json(&mut alice).await; // bob joined

    // when (操作): 不正なイベントを送った後、正しいイベントを送る
    send_json(&mut alice, json!({"type": "teleport", "roomId": "room-1"})).await;
    alice
        .send(Message::Text("not json at all".into()))
        .await
        .unwrap();
    send_json(
        &mut alice,
        json!({"type": "code-change", "roomId": "room-1", "code": "still alive"}),
    )
    .await;

    // then (期待する結果): 後続のイベントは通常どおり配送される
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["code"], "still alive");
}

#[tokio::test]
async fn test_health_endpoint_reports_ok() {
    // テスト項目: /health が 200 を返す
    // given (前提条件):
    let addr = spawn_server().await;

    // when (操作):
    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .expect("Failed to reach health endpoint");

    // then (期待する結果):
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rooms_endpoint_lists_live_rooms() {
    // テスト項目: /api/rooms が現在の Room と参加者を返す
    // given (前提条件):
    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;

    // when (操作):
    let rooms: Value = reqwest::get(format!("http://{}/api/rooms", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["roomId"], "room-1");
    let participants = rooms[0]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
}

#[tokio::test]
async fn test_execute_code_broadcasts_one_result_to_the_room() {
    // テスト項目: execute-code の結果が Room 全員に 1 回ずつ届く
    // given (前提条件): node が利用可能な環境でのみ実行
    let node_available = std::process::Command::new("node")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if !node_available {
        return;
    }

    let addr = spawn_server().await;
    let mut alice = connect(addr).await;
    let mut bob = connect(addr).await;
    join(&mut alice, "room-1", "alice").await;
    join(&mut bob, "room-1", "bob").await;
    recv_json(&mut alice).await; // bob joined

    // when (操作):
    send_json(
        &mut alice,
        json!({
            "type": "execute-code",
            "roomId": "room-1",
            "code": "console.log(\"Hello, World!\")",
            "language": "javascript"
        }),
    )
    .await;

    // then (期待する結果): 送信者を含む全員が結果を受信する
    let seen_by_alice = recv_json(&mut alice).await;
    assert_eq!(seen_by_alice["type"], "code-execution-result");
    assert_eq!(seen_by_alice["success"], true);
    assert!(
        seen_by_alice["result"]
            .as_str()
            .unwrap()
            .contains("Hello, World!")
    );
    let seen_by_bob = recv_json(&mut bob).await;
    assert_eq!(seen_by_bob["type"], "code-execution-result");
}
