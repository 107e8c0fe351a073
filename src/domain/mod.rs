//! Domain layer: value objects, entities, and the interfaces the
//! use-case layer depends on.
//!
//! Infrastructure implements the traits defined here ([`ChatRepository`],
//! [`RoomRegistry`], [`MessagePusher`]); the use-case layer only ever sees
//! the traits (dependency inversion).

mod connection;
mod conversation;
mod error;
mod message;
mod pusher;
mod registry;
mod repository;
mod user;

pub use connection::{ConnectionId, PusherChannel};
pub use conversation::{Conversation, ConversationId, UserPair};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use message::{HistoryLimit, Message, MessageText};
pub use pusher::MessagePusher;
pub use registry::RoomRegistry;
pub use repository::ChatRepository;
pub use user::{User, UserId};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use registry::MockRoomRegistry;
#[cfg(test)]
pub use repository::MockChatRepository;
