//! Conversation identity: canonical participant pairs and the
//! conversation entity.

use chrono::{DateTime, Utc};

use super::{DomainError, UserId};

/// Store-assigned conversation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(i64);

impl ConversationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical unordered pair of participants.
///
/// The pair is sorted lexicographically on construction so that
/// `(a, b)` and `(b, a)` produce the same value, which is what makes a
/// direct conversation unique per pair of users. A user cannot form a
/// pair with themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserPair {
    low: UserId,
    high: UserId,
}

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::SelfConversation);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    pub fn low(&self) -> &UserId {
        &self.low
    }

    pub fn high(&self) -> &UserId {
        &self.high
    }
}

/// A direct conversation between exactly two users. Created lazily on
/// first resolution, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub pair: UserPair,
    pub created_at: DateTime<Utc>,
}
