//! Collaborative code session server.
//!
//! Rooms of WebSocket participants share a code buffer, inline comments and
//! chat, and can run the buffer in a sandboxed toolchain.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kyodo-server
//! cargo run --bin kyodo-server -- --host 127.0.0.1 --port 3000
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

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
use kyodo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kyodo-server")]
#[command(about = "Collaborative code session server with sandboxed execution", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Root directory for sandbox workspaces (defaults to the OS temp dir)
    #[arg(long)]
    temp_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry
    // 2. MessagePusher
    // 3. Sandbox
    // 4. UseCases
    // 5. Server

    // 1. Create Registry (in-memory, session state does not survive restarts)
    let registry: Arc<dyn RoomRegistry> = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Sandbox
    let temp_root = args
        .temp_dir
        .unwrap_or_else(|| std::env::temp_dir().join("kyodo"));
    let sandbox: Arc<dyn CodeSandbox> = Arc::new(ProcessSandbox::new(temp_root));

    // 4. Create UseCases
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

    // 5. Create and run the server
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
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
