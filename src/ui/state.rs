//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::{
    domain::MessagePusher,
    usecase::{
        DisconnectUseCase, GetMessagesUseCase, JoinConversationUseCase, ListUsersUseCase,
        ResolveConversationUseCase, SeedUsersUseCase, SendMessageUseCase,
    },
};

/// One field per use case, plus the pusher the WebSocket handler
/// registers new connections with.
pub struct AppState {
    pub resolve_conversation_usecase: Arc<ResolveConversationUseCase>,
    pub join_conversation_usecase: Arc<JoinConversationUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub list_users_usecase: Arc<ListUsersUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    pub seed_users_usecase: Arc<SeedUsersUseCase>,
    pub message_pusher: Arc<dyn MessagePusher>,
}
