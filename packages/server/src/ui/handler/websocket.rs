//! WebSocket connection handlers.
//!
//! One connection = one socket id (generated here at upgrade time) plus two
//! tasks: a recv loop that routes this sender's events in order, and a
//! pusher loop that drains the client's outbound channel. Room membership
//! starts when the `join` event arrives, not at upgrade.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{RoomId, SocketId, SocketIdFactory, Username},
    infrastructure::dto::websocket::{
        AddCommentMessage, ChatBroadcastMessage, ClientEvent, ClientInfo,
        CodeChangeMessage, CodeExecutionResultMessage, DisconnectedMessage, JoinedMessage,
        LanguageChangeMessage, MessageType,
    },
    ui::state::AppState,
    usecase::SendChatError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The transport layer owns connection identity: a fresh opaque id per
    // upgrade, no continuity across reconnects
    let socket_id = SocketIdFactory::generate();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(socket_id.clone(), tx)
        .await;

    tracing::info!("Client '{}' connected", socket_id.as_str());

    ws.on_upgrade(move |socket| handle_socket(socket, state, socket_id, rx))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    socket_id: SocketId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to receive messages from other clients and send to this client
    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let socket_id_clone = socket_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Parse the incoming event; a malformed payload drops
                    // the event, never the connection
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed event from '{}': {}",
                                socket_id_clone.as_str(),
                                e
                            );
                            continue;
                        }
                    };

                    handle_event(&state_clone, &socket_id_clone, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", socket_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Synthesize the disconnect on behalf of the closed connection, even
    // when the close was abrupt (no explicit leave message)
    if let Some((room_id, participant, notify_targets)) = state
        .disconnect_participant_usecase
        .execute(&socket_id)
        .await
    {
        let left_msg = DisconnectedMessage {
            r#type: MessageType::Disconnected,
            socket_id: socket_id.as_str().to_string(),
            username: participant.username.into_string(),
        };

        let left_json = serde_json::to_string(&left_msg).unwrap();
        if let Err(e) = state
            .disconnect_participant_usecase
            .broadcast_disconnected(notify_targets, &left_json)
            .await
        {
            tracing::warn!("Failed to broadcast disconnected: {}", e);
        } else {
            tracing::info!(
                "Client '{}' disconnected from room '{}'",
                socket_id.as_str(),
                room_id.as_str()
            );
        }
    } else {
        tracing::info!(
            "Client '{}' disconnected (was not in a room)",
            socket_id.as_str()
        );
    }
}

/// Route one inbound event to its use case and audience.
async fn handle_event(state: &Arc<AppState>, socket_id: &SocketId, event: ClientEvent) {
    match event {
        ClientEvent::Join { room_id, username } => {
            let (room_id, username) = match (RoomId::new(room_id), Username::new(username)) {
                (Ok(room_id), Ok(username)) => (room_id, username),
                _ => {
                    tracing::warn!("Dropping join event with invalid payload");
                    return;
                }
            };

            let members = state
                .join_room_usecase
                .execute(room_id.clone(), username.clone(), socket_id.clone())
                .await;

            // Domain Model から DTO への変換
            let clients: Vec<ClientInfo> = members
                .iter()
                .map(|p| ClientInfo {
                    socket_id: p.socket_id.as_str().to_string(),
                    username: p.username.as_str().to_string(),
                })
                .collect();

            let joined_msg = JoinedMessage {
                r#type: MessageType::Joined,
                clients,
                username: username.as_str().to_string(),
                socket_id: socket_id.as_str().to_string(),
            };

            let joined_json = serde_json::to_string(&joined_msg).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_joined(&room_id, &joined_json)
                .await
            {
                tracing::warn!("Failed to broadcast joined: {}", e);
            } else {
                tracing::info!(
                    "Client '{}' joined room '{}'",
                    socket_id.as_str(),
                    room_id.as_str()
                );
            }
        }

        ClientEvent::CodeChange { room_id, code } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Dropping code-change event with invalid room id");
                return;
            };

            let msg = CodeChangeMessage {
                r#type: MessageType::CodeChange,
                code,
            };
            let json = serde_json::to_string(&msg).unwrap();
            if let Err(e) = state
                .relay_code_usecase
                .broadcast_change(&room_id, socket_id, &json)
                .await
            {
                tracing::warn!("Failed to broadcast code-change: {}", e);
            }
        }

        ClientEvent::SyncCode {
            socket_id: target,
            code,
        } => {
            let Ok(target) = SocketId::new(target) else {
                tracing::warn!("Dropping sync-code event with invalid target");
                return;
            };

            // The target receives the buffer as a regular code-change
            let msg = CodeChangeMessage {
                r#type: MessageType::CodeChange,
                code,
            };
            let json = serde_json::to_string(&msg).unwrap();
            if let Err(e) = state.relay_code_usecase.sync_to(&target, &json).await {
                tracing::warn!(
                    "Dropping sync-code to unknown target '{}': {}",
                    target.as_str(),
                    e
                );
            }
        }

        ClientEvent::AddComment { room_id, comment } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Dropping add-comment event with invalid room id");
                return;
            };

            tracing::info!("New comment received on line {}", comment.line_number);

            let msg = AddCommentMessage {
                r#type: MessageType::AddComment,
                comment,
            };
            let json = serde_json::to_string(&msg).unwrap();
            if let Err(e) = state.add_comment_usecase.execute(&room_id, &json).await {
                tracing::warn!("Failed to broadcast add-comment: {}", e);
            }
        }

        ClientEvent::ChatMessage { username, message } => {
            tracing::info!("{} sent a message: {}", username, message);

            let msg = ChatBroadcastMessage {
                r#type: MessageType::ChatMessage,
                username,
                message,
            };
            let json = serde_json::to_string(&msg).unwrap();
            match state.send_chat_usecase.execute(socket_id, &json).await {
                Ok(_room_id) => {}
                Err(SendChatError::NotInARoom) => {
                    tracing::warn!(
                        "Dropping chat message from roomless connection '{}'",
                        socket_id.as_str()
                    );
                }
            }
        }

        ClientEvent::LanguageChange {
            room_id,
            new_language,
        } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Dropping language-change event with invalid room id");
                return;
            };

            let msg = LanguageChangeMessage {
                r#type: MessageType::LanguageChange,
                new_language,
            };
            let json = serde_json::to_string(&msg).unwrap();
            if let Err(e) = state
                .change_language_usecase
                .execute(&room_id, socket_id, &json)
                .await
            {
                tracing::warn!("Failed to broadcast language-change: {}", e);
            }
        }

        ClientEvent::ExecuteCode {
            room_id,
            code,
            language,
        } => {
            let Ok(room_id) = RoomId::new(room_id) else {
                tracing::warn!("Dropping execute-code event with invalid room id");
                return;
            };

            // The sandbox run is the one long-blocking operation; dispatch
            // it on a detached task so this recv loop (and every other
            // room's traffic) keeps flowing while the run is in flight
            let state = state.clone();
            tokio::spawn(async move {
                let (outcome, targets) = state
                    .execute_code_usecase
                    .execute(&room_id, &code, &language)
                    .await;

                let result_msg = CodeExecutionResultMessage {
                    r#type: MessageType::CodeExecutionResult,
                    result: outcome.output,
                    success: outcome.success,
                };
                let json = serde_json::to_string(&result_msg).unwrap();
                if let Err(e) = state
                    .execute_code_usecase
                    .broadcast_result(targets, &json)
                    .await
                {
                    tracing::warn!("Failed to broadcast execution result: {}", e);
                }
            });
        }
    }
}
