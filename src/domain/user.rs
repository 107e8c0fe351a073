//! User identity value objects.

use super::DomainError;

/// Opaque stable user identifier (an email-like token in practice).
///
/// Guaranteed non-empty after trimming; the string is stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Create a new `UserId`, rejecting identifiers that are empty after
    /// trimming whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A known participant. Users are upserted on first sight (conversation
/// resolution, message send, seeding) and never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Placeholder user for an identifier seen for the first time: the
    /// identifier doubles as the display name until a seed provides one.
    pub fn placeholder(id: UserId) -> Self {
        let name = id.as_str().to_string();
        Self { id, name }
    }
}
