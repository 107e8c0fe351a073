//! UseCase: persist a message and fan it out to the conversation's room.

use std::sync::Arc;

use crate::domain::{
    ChatRepository, ConnectionId, ConversationId, Message, MessagePusher, MessageText,
    RoomRegistry, User, UserId,
};

use super::error::SendMessageError;

/// The broadcast dispatcher: validate, persist, then fan out.
///
/// Persistence strictly precedes broadcast. `execute` returns only after
/// the message is durable, and the fan-out targets it returns are a
/// snapshot of the room at that moment; a receiver can never observe a
/// message that is not yet stored.
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        registry: Arc<dyn RoomRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            registry,
            message_pusher,
        }
    }

    /// Validate and persist one message.
    ///
    /// Returns the stored message together with the room members to fan
    /// out to. Blank sender or text is rejected before any storage call;
    /// the WebSocket handler drops such events silently, matching the
    /// protocol's lack of an error-acknowledgment channel.
    pub async fn execute(
        &self,
        conversation_id: i64,
        sender_id: &str,
        text: &str,
    ) -> Result<(Message, Vec<ConnectionId>), SendMessageError> {
        // 1. Validation never reaches the storage layer.
        let sender_id = UserId::new(sender_id).map_err(|_| SendMessageError::MissingSender)?;
        let text = MessageText::new(text).map_err(|_| SendMessageError::EmptyText)?;
        let conversation_id = ConversationId::new(conversation_id);

        // 2. Upsert the sender if unseen.
        self.repository
            .upsert_user(User::placeholder(sender_id.clone()))
            .await?;

        // 3. Persist; the store assigns id and timestamp.
        let message = self
            .repository
            .append_message(conversation_id, &sender_id, &text)
            .await?;

        // 4. Snapshot the room for fan-out (sender included: receiving
        //    the broadcast is the only acknowledgment).
        let targets = self.registry.members(conversation_id).await;
        Ok((message, targets))
    }

    /// Fan one serialized event out to the given connections. Individual
    /// delivery failures are logged and skipped by the pusher.
    pub async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &str) {
        self.message_pusher.broadcast(targets, payload).await;
    }
}
