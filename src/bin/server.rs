//! Direct-messaging relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000 --database-url sqlite:chat.db
//! ```

use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use dm_relay::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry,
        repository::SqliteChatRepository,
    },
    ui::Server,
    usecase::{
        DisconnectUseCase, GetMessagesUseCase, JoinConversationUseCase, ListUsersUseCase,
        ResolveConversationUseCase, SeedUsersUseCase, SendMessageUseCase,
    },
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Direct-messaging relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:dm-relay.db")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Store (pool + schema)
    // 2. Registry and MessagePusher
    // 3. UseCases
    // 4. Server

    let connect_options = SqliteConnectOptions::from_str(&args.database_url)
        .expect("invalid database URL")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(connect_options)
        .await
        .expect("failed to open database");

    let repository = Arc::new(SqliteChatRepository::new(pool, Arc::new(SystemClock)));
    if let Err(e) = repository.migrate().await {
        tracing::error!("Schema migration failed: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Database ready at {}", args.database_url);

    let registry = Arc::new(InMemoryRoomRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let resolve_conversation_usecase =
        Arc::new(ResolveConversationUseCase::new(repository.clone()));
    let join_conversation_usecase = Arc::new(JoinConversationUseCase::new(
        repository.clone(),
        registry.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        registry.clone(),
        message_pusher.clone(),
    ));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let list_users_usecase = Arc::new(ListUsersUseCase::new(repository.clone()));
    let get_messages_usecase = Arc::new(GetMessagesUseCase::new(repository.clone()));
    let seed_users_usecase = Arc::new(SeedUsersUseCase::new(repository.clone()));

    let server = Server::new(
        resolve_conversation_usecase,
        join_conversation_usecase,
        send_message_usecase,
        disconnect_usecase,
        list_users_usecase,
        get_messages_usecase,
        seed_users_usecase,
        message_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
