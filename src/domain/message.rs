//! Message entity and the value objects guarding the write/read paths.

use chrono::{DateTime, Utc};

use super::{ConversationId, DomainError, UserId};

/// Validated message body: trimmed, guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted chat message.
///
/// `id` comes from a store-wide sequence (not per conversation), so ids
/// strictly increase within a conversation and across the whole store.
/// `created_at` is assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded history window for `recent` reads.
///
/// Absent or non-positive limits fall back to the default of 50; anything
/// above the cap of 500 is clamped down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(i64);

impl HistoryLimit {
    pub const DEFAULT: i64 = 50;
    pub const MAX: i64 = 500;

    pub fn new(requested: Option<i64>) -> Self {
        let limit = match requested {
            Some(n) if n > 0 => n.min(Self::MAX),
            _ => Self::DEFAULT,
        };
        Self(limit)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
