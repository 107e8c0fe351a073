//! Room membership interface.

use async_trait::async_trait;

use super::{ConnectionId, ConversationId};

/// In-memory mapping from a conversation to the live connections
/// currently joined to its room.
///
/// Membership is ephemeral: it is never persisted and an implementation
/// starts empty on process restart. A connection may be a member of any
/// number of rooms at once. All operations are idempotent and O(1)
/// amortized per member.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Register the connection as a member of the conversation's room.
    async fn join(&self, conversation_id: ConversationId, connection_id: ConnectionId);

    /// Remove one membership; no-op when the connection is not a member.
    async fn leave(&self, conversation_id: ConversationId, connection_id: ConnectionId);

    /// Snapshot of the room's current members, for broadcast fan-out.
    async fn members(&self, conversation_id: ConversationId) -> Vec<ConnectionId>;

    /// Remove the connection from every room it joined (disconnect path).
    async fn remove_connection(&self, connection_id: ConnectionId);
}
