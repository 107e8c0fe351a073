//! UseCase: list all known users for selection in a client UI.

use std::sync::Arc;

use crate::domain::{ChatRepository, RepositoryError, User};

pub struct ListUsersUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl ListUsersUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// All users, ordered by display name ascending.
    pub async fn execute(&self) -> Result<Vec<User>, RepositoryError> {
        self.repository.list_users().await
    }
}
