//! UseCase: join a conversation's room and fetch the history snapshot.

use std::sync::Arc;

use crate::domain::{
    ChatRepository, ConnectionId, ConversationId, HistoryLimit, Message, RoomRegistry,
};

use super::error::JoinConversationError;

/// Registers a live connection as a room member and returns the recent
/// history to replay to that connection only.
pub struct JoinConversationUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<dyn RoomRegistry>,
}

impl JoinConversationUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, registry: Arc<dyn RoomRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Join the room for `conversation_id` and return the most recent
    /// messages, oldest first.
    ///
    /// Membership is registered before the history read, so a message
    /// broadcast concurrently with the join is either in the snapshot or
    /// delivered live; it cannot fall into a gap between the two.
    pub async fn execute(
        &self,
        conversation_id: i64,
        connection_id: ConnectionId,
    ) -> Result<Vec<Message>, JoinConversationError> {
        let conversation_id = ConversationId::new(conversation_id);

        if !self.repository.conversation_exists(conversation_id).await? {
            return Err(JoinConversationError::ConversationNotFound(
                conversation_id.value(),
            ));
        }

        self.registry.join(conversation_id, connection_id).await;

        let history = self
            .repository
            .recent_messages(conversation_id, HistoryLimit::default())
            .await?;
        Ok(history)
    }
}
