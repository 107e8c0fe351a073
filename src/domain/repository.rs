//! Storage interface required by the use-case layer.
//!
//! The concrete implementation lives in the infrastructure layer
//! (dependency inversion); use cases only ever depend on this trait.

use async_trait::async_trait;

use super::{
    Conversation, ConversationId, HistoryLimit, Message, MessageText, RepositoryError, User,
    UserId, UserPair,
};

/// Durable store for users, conversations and the append-only message
/// log.
///
/// Message ids are assigned by the store from a store-wide sequence, and
/// timestamps at insert time; id assignment is atomic per append, so a
/// later append never receives a smaller id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Insert the user if unknown; an existing row is left untouched.
    async fn upsert_user(&self, user: User) -> Result<(), RepositoryError>;

    /// All known users, ordered by display name ascending.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Look up the conversation for a canonical pair, if one exists.
    async fn find_conversation(
        &self,
        pair: &UserPair,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Insert a new conversation for the pair.
    ///
    /// Returns [`RepositoryError::Conflict`] when the store's uniqueness
    /// constraint rejects the insert because another caller created the
    /// same pair concurrently.
    async fn insert_conversation(&self, pair: &UserPair) -> Result<Conversation, RepositoryError>;

    /// Whether a conversation with this id exists.
    async fn conversation_exists(&self, id: ConversationId) -> Result<bool, RepositoryError>;

    /// Append one message; the store assigns the id and timestamp.
    ///
    /// Returns [`RepositoryError::ConversationNotFound`] when the
    /// conversation does not exist.
    async fn append_message(
        &self,
        conversation_id: ConversationId,
        sender_id: &UserId,
        text: &MessageText,
    ) -> Result<Message, RepositoryError>;

    /// The most recent messages of a conversation, oldest first.
    async fn recent_messages(
        &self,
        conversation_id: ConversationId,
        limit: HistoryLimit,
    ) -> Result<Vec<Message>, RepositoryError>;
}
