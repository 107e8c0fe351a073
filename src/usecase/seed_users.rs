//! UseCase: idempotent bulk upsert of users.

use std::sync::Arc;

use crate::domain::{ChatRepository, User, UserId};

use super::error::SeedUsersError;

/// Seeds the user directory. Re-seeding the same users is a no-op, so
/// the operation can run on every deploy.
pub struct SeedUsersUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl SeedUsersUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// Upsert each `(id, name)` entry and return how many were
    /// processed. An empty id anywhere in the batch rejects the request
    /// before any write.
    pub async fn execute(&self, users: Vec<(String, String)>) -> Result<usize, SeedUsersError> {
        let users = users
            .into_iter()
            .map(|(id, name)| Ok(User::new(UserId::new(id)?, name)))
            .collect::<Result<Vec<_>, SeedUsersError>>()?;

        let count = users.len();
        for user in users {
            self.repository.upsert_user(user).await?;
        }
        Ok(count)
    }
}
