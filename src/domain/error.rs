//! Domain-level error types.

use thiserror::Error;

use super::ConnectionId;

/// Validation failures on domain value objects. These never reach the
/// storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("message text must not be empty")]
    EmptyMessage,
    #[error("a conversation requires two distinct participants")]
    SelfConversation,
}

/// Failures reported by a [`super::ChatRepository`] implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("conversation {0} not found")]
    ConversationNotFound(i64),
    /// Uniqueness race on conversation creation: another caller inserted
    /// the same pair first. Recovered by re-reading, never surfaced.
    #[error("conversation already exists for this pair")]
    Conflict,
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failures when pushing an event to a live connection.
#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("connection {0} is not registered")]
    ConnectionNotFound(ConnectionId),
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
