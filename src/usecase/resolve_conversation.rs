//! UseCase: resolve (or lazily create) the direct conversation between
//! two users.

use std::sync::Arc;

use crate::domain::{ChatRepository, Conversation, RepositoryError, User, UserId, UserPair};

use super::error::ResolveConversationError;

/// Maps an unordered pair of user identifiers to its one canonical
/// conversation, creating it on first resolution.
pub struct ResolveConversationUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl ResolveConversationUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// Resolve the conversation for `(me, other)`, order-independent.
    ///
    /// Unknown users are upserted as placeholders first, so no
    /// pre-registration is required. Concurrent first-time resolution is
    /// safe: when the insert loses the uniqueness race the winner's row
    /// is re-read instead of failing the caller.
    pub async fn execute(
        &self,
        me: &str,
        other: &str,
    ) -> Result<Conversation, ResolveConversationError> {
        // 1. Validate and canonicalize the pair.
        let me = UserId::new(me)?;
        let other = UserId::new(other)?;
        let pair = UserPair::new(me.clone(), other.clone())?;

        // 2. Upsert placeholder users for unseen identifiers.
        self.repository.upsert_user(User::placeholder(me)).await?;
        self.repository.upsert_user(User::placeholder(other)).await?;

        // 3. Fast path: the conversation already exists.
        if let Some(conversation) = self.repository.find_conversation(&pair).await? {
            return Ok(conversation);
        }

        // 4. Create it; a Conflict means another caller won the race, so
        //    re-read their row.
        match self.repository.insert_conversation(&pair).await {
            Ok(conversation) => Ok(conversation),
            Err(RepositoryError::Conflict) => self
                .repository
                .find_conversation(&pair)
                .await?
                .ok_or_else(|| {
                    ResolveConversationError::Storage(RepositoryError::Backend(
                        "conversation vanished after uniqueness conflict".to_string(),
                    ))
                }),
            Err(other) => Err(other.into()),
        }
    }
}
