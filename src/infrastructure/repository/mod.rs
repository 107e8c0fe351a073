//! Repository implementations.

mod sqlite;

pub use sqlite::SqliteChatRepository;
