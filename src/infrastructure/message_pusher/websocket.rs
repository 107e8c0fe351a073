//! WebSocket-backed [`MessagePusher`] implementation.
//!
//! The UI layer owns the WebSocket itself; it creates the per-connection
//! `mpsc` channel and hands the sender half over via `register`. This
//! implementation only manages the senders and writes serialized events
//! into them, which keeps "accepting a connection" and "delivering a
//! message" in separate layers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// Registry of live outbound channels, keyed by connection.
#[derive(Default)]
pub struct WebSocketMessagePusher {
    channels: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(connection_id, sender);
        tracing::debug!("Connection {} registered with pusher", connection_id);
    }

    async fn unregister(&self, connection_id: ConnectionId) {
        let mut channels = self.channels.lock().await;
        channels.remove(&connection_id);
        tracing::debug!("Connection {} unregistered from pusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;
        let sender = channels
            .get(&connection_id)
            .ok_or(MessagePushError::ConnectionNotFound(connection_id))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) {
        let channels = self.channels.lock().await;
        for target in targets {
            match channels.get(&target) {
                Some(sender) => {
                    // A closed channel means the connection is tearing
                    // down; skip it and keep delivering to the rest.
                    if sender.send(content.to_string()).is_err() {
                        tracing::warn!("Failed to push message to connection {}", target);
                    }
                }
                None => {
                    tracing::warn!("Connection {} not found during broadcast, skipping", target);
                }
            }
        }
    }
}
