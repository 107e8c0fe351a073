//! Outbound message delivery interface.

use async_trait::async_trait;

use super::{ConnectionId, MessagePushError, PusherChannel};

/// Delivery of serialized events to live connections.
///
/// Implementations hold the per-connection outbound channels; the
/// WebSocket itself is created and owned by the UI layer, which hands
/// the sender half over via [`MessagePusher::register`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound channel.
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Drop a connection's outbound channel.
    async fn unregister(&self, connection_id: ConnectionId);

    /// Push one event to a single connection.
    async fn push_to(
        &self,
        connection_id: ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push one event to every target connection. Delivery failure to one
    /// connection is logged and skipped, never aborting the rest of the
    /// fan-out.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str);
}
