//! Server construction and execution.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    domain::MessagePusher,
    usecase::{
        DisconnectUseCase, GetMessagesUseCase, JoinConversationUseCase, ListUsersUseCase,
        ResolveConversationUseCase, SeedUsersUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{
        direct_conversation, get_conversation_messages, health_check, list_users, seed_users,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// The relay server: HTTP API plus the `/ws` event stream.
pub struct Server {
    resolve_conversation_usecase: Arc<ResolveConversationUseCase>,
    join_conversation_usecase: Arc<JoinConversationUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    list_users_usecase: Arc<ListUsersUseCase>,
    get_messages_usecase: Arc<GetMessagesUseCase>,
    seed_users_usecase: Arc<SeedUsersUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolve_conversation_usecase: Arc<ResolveConversationUseCase>,
        join_conversation_usecase: Arc<JoinConversationUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        list_users_usecase: Arc<ListUsersUseCase>,
        get_messages_usecase: Arc<GetMessagesUseCase>,
        seed_users_usecase: Arc<SeedUsersUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            resolve_conversation_usecase,
            join_conversation_usecase,
            send_message_usecase,
            disconnect_usecase,
            list_users_usecase,
            get_messages_usecase,
            seed_users_usecase,
            message_pusher,
        }
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            resolve_conversation_usecase: self.resolve_conversation_usecase,
            join_conversation_usecase: self.join_conversation_usecase,
            send_message_usecase: self.send_message_usecase,
            disconnect_usecase: self.disconnect_usecase,
            list_users_usecase: self.list_users_usecase,
            get_messages_usecase: self.get_messages_usecase,
            seed_users_usecase: self.seed_users_usecase,
            message_pusher: self.message_pusher,
        });

        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .route("/health", get(health_check))
            .route("/users", get(list_users))
            .route("/conversations/direct", get(direct_conversation))
            .route(
                "/conversations/{conversation_id}/messages",
                get(get_conversation_messages),
            )
            .route("/seed-users", post(seed_users))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Event stream at ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
