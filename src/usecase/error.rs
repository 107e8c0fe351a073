//! Error types for the use-case layer.
//!
//! Validation failures never reach the storage layer, and a storage
//! failure never leaves a message half-broadcast: `send` persists first
//! and only then fans out.

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

#[derive(Debug, Error)]
pub enum ResolveConversationError {
    /// Empty identifier or a user paired with themselves.
    #[error(transparent)]
    InvalidArgument(#[from] DomainError),
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum JoinConversationError {
    #[error("conversation {0} not found")]
    ConversationNotFound(i64),
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("sender id is missing or blank")]
    MissingSender,
    #[error("message text is empty after trimming")]
    EmptyText,
    #[error("conversation {0} not found")]
    ConversationNotFound(i64),
    #[error("storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for SendMessageError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConversationNotFound(id) => Self::ConversationNotFound(id),
            other => Self::Storage(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum GetMessagesError {
    #[error("conversation {0} not found")]
    ConversationNotFound(i64),
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

#[derive(Debug, Error)]
pub enum SeedUsersError {
    #[error(transparent)]
    InvalidArgument(#[from] DomainError),
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
