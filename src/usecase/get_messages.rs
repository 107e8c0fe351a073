//! UseCase: read the recent messages of a conversation over HTTP.

use std::sync::Arc;

use crate::domain::{ChatRepository, ConversationId, HistoryLimit, Message};

use super::error::GetMessagesError;

pub struct GetMessagesUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetMessagesUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// The most recent `limit` messages, oldest first. A missing or
    /// non-positive limit falls back to the default of 50.
    pub async fn execute(
        &self,
        conversation_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, GetMessagesError> {
        let conversation_id = ConversationId::new(conversation_id);

        if !self.repository.conversation_exists(conversation_id).await? {
            return Err(GetMessagesError::ConversationNotFound(
                conversation_id.value(),
            ));
        }

        let messages = self
            .repository
            .recent_messages(conversation_id, HistoryLimit::new(limit))
            .await?;
        Ok(messages)
    }
}
