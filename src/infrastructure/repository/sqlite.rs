//! SQLite-backed [`ChatRepository`].
//!
//! Messages share one `AUTOINCREMENT` sequence across all conversations,
//! so ids are globally monotonic and strictly increasing within each
//! conversation. The `UNIQUE (user1_id, user2_id)` constraint on
//! conversations is the enforcement point for "one conversation per
//! pair": a concurrent first-time insert loses the race with a unique
//! violation, surfaced as [`RepositoryError::Conflict`] for the caller to
//! recover from by re-reading.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    common::time::Clock,
    domain::{
        ChatRepository, Conversation, ConversationId, HistoryLimit, Message, MessageText,
        RepositoryError, User, UserId, UserPair,
    },
};

/// SQLite implementation of the chat store.
pub struct SqliteChatRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteChatRepository {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Ensure the schema exists. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user1_id TEXT NOT NULL,
                user2_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE (user1_id, user2_id),
                FOREIGN KEY (user1_id) REFERENCES users (id),
                FOREIGN KEY (user2_id) REFERENCES users (id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id INTEGER NOT NULL,
                sender_id TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (conversation_id) REFERENCES conversations (id),
                FOREIGN KEY (sender_id) REFERENCES users (id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation
                ON messages (conversation_id, id)",
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl ChatRepository for SqliteChatRepository {
    async fn upsert_user(&self, user: User) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO users (id, name) VALUES (?, ?) ON CONFLICT (id) DO NOTHING")
            .bind(user.id.as_str())
            .bind(&user.name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, name FROM users ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|(id, name)| Ok(User::new(decode_user_id(id)?, name)))
            .collect()
    }

    async fn find_conversation(
        &self,
        pair: &UserPair,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row: Option<(i64, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, created_at FROM conversations WHERE user1_id = ? AND user2_id = ?",
        )
        .bind(pair.low().as_str())
        .bind(pair.high().as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|(id, created_at)| Conversation {
            id: ConversationId::new(id),
            pair: pair.clone(),
            created_at,
        }))
    }

    async fn insert_conversation(&self, pair: &UserPair) -> Result<Conversation, RepositoryError> {
        let created_at = self.clock.now();
        let result =
            sqlx::query("INSERT INTO conversations (user1_id, user2_id, created_at) VALUES (?, ?, ?)")
                .bind(pair.low().as_str())
                .bind(pair.high().as_str())
                .bind(created_at)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(Conversation {
            id: ConversationId::new(result.last_insert_rowid()),
            pair: pair.clone(),
            created_at,
        })
    }

    async fn conversation_exists(&self, id: ConversationId) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM conversations WHERE id = ?")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.is_some())
    }

    async fn append_message(
        &self,
        conversation_id: ConversationId,
        sender_id: &UserId,
        text: &MessageText,
    ) -> Result<Message, RepositoryError> {
        // Conversations are never deleted, so an existence check ahead of
        // the insert cannot go stale.
        if !self.conversation_exists(conversation_id).await? {
            return Err(RepositoryError::ConversationNotFound(
                conversation_id.value(),
            ));
        }

        let created_at = self.clock.now();
        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, sender_id, text, created_at)
                VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id.value())
        .bind(sender_id.as_str())
        .bind(text.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Message {
            id: result.last_insert_rowid(),
            conversation_id,
            sender_id: sender_id.clone(),
            text: text.as_str().to_string(),
            created_at,
        })
    }

    async fn recent_messages(
        &self,
        conversation_id: ConversationId,
        limit: HistoryLimit,
    ) -> Result<Vec<Message>, RepositoryError> {
        // Retrieve the last N by descending id, then reverse so the
        // caller sees a chronological, oldest-first window.
        let rows: Vec<(i64, String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, sender_id, text, created_at
                FROM messages
                WHERE conversation_id = ?
                ORDER BY id DESC
                LIMIT ?",
        )
        .bind(conversation_id.value())
        .bind(limit.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut messages = rows
            .into_iter()
            .map(|(id, sender_id, text, created_at)| {
                Ok(Message {
                    id,
                    conversation_id,
                    sender_id: decode_user_id(sender_id)?,
                    text,
                    created_at,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;
        messages.reverse();
        Ok(messages)
    }
}

/// A user id read back from the store was validated on write, so a
/// decode failure means the database was tampered with.
fn decode_user_id(raw: String) -> Result<UserId, RepositoryError> {
    UserId::new(raw).map_err(|e| RepositoryError::Backend(e.to_string()))
}

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict;
    }
    RepositoryError::Backend(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::time::{FixedClock, SystemClock};
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;

    // A single-connection pool: with "sqlite::memory:" every pool
    // connection would otherwise get its own empty database.
    async fn memory_repository() -> SqliteChatRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = SqliteChatRepository::new(pool, Arc::new(SystemClock));
        repo.migrate().await.unwrap();
        repo
    }

    fn pair(a: &str, b: &str) -> UserPair {
        UserPair::new(UserId::new(a).unwrap(), UserId::new(b).unwrap()).unwrap()
    }

    async fn seed_pair(repo: &SqliteChatRepository, a: &str, b: &str) -> Conversation {
        repo.upsert_user(User::placeholder(UserId::new(a).unwrap()))
            .await
            .unwrap();
        repo.upsert_user(User::placeholder(UserId::new(b).unwrap()))
            .await
            .unwrap();
        repo.insert_conversation(&pair(a, b)).await.unwrap()
    }

    #[tokio::test]
    async fn upsert_user_is_idempotent_and_keeps_first_name() {
        let repo = memory_repository().await;
        let id = UserId::new("sai@example.com").unwrap();

        repo.upsert_user(User::new(id.clone(), "Sai")).await.unwrap();
        repo.upsert_user(User::new(id.clone(), "Someone Else"))
            .await
            .unwrap();

        let users = repo.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Sai");
    }

    #[tokio::test]
    async fn list_users_orders_by_name() {
        let repo = memory_repository().await;
        repo.upsert_user(User::new(UserId::new("z@example.com").unwrap(), "Ankit"))
            .await
            .unwrap();
        repo.upsert_user(User::new(UserId::new("a@example.com").unwrap(), "Zoe"))
            .await
            .unwrap();

        let users = repo.list_users().await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Ankit", "Zoe"]);
    }

    #[tokio::test]
    async fn insert_conversation_assigns_increasing_ids() {
        let repo = memory_repository().await;

        let first = seed_pair(&repo, "a@x.com", "b@x.com").await;
        let second = seed_pair(&repo, "c@x.com", "d@x.com").await;

        assert_eq!(first.id.value(), 1);
        assert_eq!(second.id.value(), 2);
    }

    #[tokio::test]
    async fn duplicate_pair_insert_reports_conflict() {
        let repo = memory_repository().await;
        seed_pair(&repo, "a@x.com", "b@x.com").await;

        let result = repo.insert_conversation(&pair("a@x.com", "b@x.com")).await;

        assert!(matches!(result, Err(RepositoryError::Conflict)));
    }

    #[tokio::test]
    async fn find_conversation_round_trips() {
        let repo = memory_repository().await;
        let created = seed_pair(&repo, "a@x.com", "b@x.com").await;

        let found = repo
            .find_conversation(&pair("a@x.com", "b@x.com"))
            .await
            .unwrap();

        assert_eq!(found, Some(created));
        assert_eq!(
            repo.find_conversation(&pair("a@x.com", "c@x.com"))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn append_message_to_unknown_conversation_is_not_found() {
        let repo = memory_repository().await;
        let sender = UserId::new("a@x.com").unwrap();
        let text = MessageText::new("hello").unwrap();

        let result = repo
            .append_message(ConversationId::new(42), &sender, &text)
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::ConversationNotFound(42))
        ));
    }

    #[tokio::test]
    async fn append_message_uses_store_clock() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = SqliteChatRepository::new(pool, Arc::new(FixedClock::new(instant)));
        repo.migrate().await.unwrap();
        let conversation = seed_pair(&repo, "a@x.com", "b@x.com").await;

        let message = repo
            .append_message(
                conversation.id,
                &UserId::new("a@x.com").unwrap(),
                &MessageText::new("hi").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(message.created_at, instant);
    }

    #[tokio::test]
    async fn recent_messages_is_a_chronological_suffix() {
        let repo = memory_repository().await;
        let conversation = seed_pair(&repo, "a@x.com", "b@x.com").await;
        let sender = UserId::new("a@x.com").unwrap();

        for i in 1..=5 {
            repo.append_message(
                conversation.id,
                &sender,
                &MessageText::new(format!("msg {i}")).unwrap(),
            )
            .await
            .unwrap();
        }

        let recent = repo
            .recent_messages(conversation.id, HistoryLimit::new(Some(3)))
            .await
            .unwrap();

        let texts: Vec<_> = recent.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["msg 3", "msg 4", "msg 5"]);
        let ids: Vec<_> = recent.iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn recent_messages_on_empty_conversation_is_empty() {
        let repo = memory_repository().await;
        let conversation = seed_pair(&repo, "a@x.com", "b@x.com").await;

        let recent = repo
            .recent_messages(conversation.id, HistoryLimit::default())
            .await
            .unwrap();

        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn message_ids_are_global_across_conversations() {
        let repo = memory_repository().await;
        let first = seed_pair(&repo, "a@x.com", "b@x.com").await;
        let second = seed_pair(&repo, "c@x.com", "d@x.com").await;
        let alice = UserId::new("a@x.com").unwrap();
        let carol = UserId::new("c@x.com").unwrap();

        let m1 = repo
            .append_message(first.id, &alice, &MessageText::new("one").unwrap())
            .await
            .unwrap();
        let m2 = repo
            .append_message(second.id, &carol, &MessageText::new("two").unwrap())
            .await
            .unwrap();
        let m3 = repo
            .append_message(first.id, &alice, &MessageText::new("three").unwrap())
            .await
            .unwrap();

        // One sequence for the whole store, not one per conversation.
        assert_eq!((m1.id, m2.id, m3.id), (1, 2, 3));
    }
}
