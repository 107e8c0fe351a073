//! UseCase: tear down a connection's memberships when its socket closes.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RoomRegistry};

/// Removes a disconnected connection from every room and drops its
/// outbound channel.
///
/// Already-durable messages are never rolled back by a disconnect; the
/// connection simply receives no further broadcasts. There is no
/// reconnect recovery — a new connection starts with no memberships and
/// must rejoin.
pub struct DisconnectUseCase {
    registry: Arc<dyn RoomRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    pub async fn execute(&self, connection_id: ConnectionId) {
        // Memberships go first so no new fan-out can select the
        // connection, then the channel is dropped.
        self.registry.remove_connection(connection_id).await;
        self.message_pusher.unregister(connection_id).await;
        tracing::info!("Connection {} disconnected", connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConversationId,
        infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryRoomRegistry},
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn disconnect_clears_memberships_and_channel() {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry.clone(), pusher.clone());
        let connection = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register(connection, tx).await;
        registry.join(ConversationId::new(1), connection).await;
        registry.join(ConversationId::new(2), connection).await;

        usecase.execute(connection).await;

        assert!(registry.members(ConversationId::new(1)).await.is_empty());
        assert!(registry.members(ConversationId::new(2)).await.is_empty());
        assert!(pusher.push_to(connection, "late").await.is_err());
    }

    #[tokio::test]
    async fn disconnect_of_unknown_connection_is_harmless() {
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = DisconnectUseCase::new(registry, pusher);

        usecase.execute(ConnectionId::generate()).await;
    }
}
