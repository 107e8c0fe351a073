//! In-memory [`RoomRegistry`] implementation.
//!
//! One mutex guards both directions of the membership relation, so the
//! forward map (room -> connections) and the reverse map
//! (connection -> rooms) can never disagree. The lock is only held for
//! map mutation or a snapshot, never across storage awaits.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConversationId, RoomRegistry};

#[derive(Default)]
struct Memberships {
    /// conversation -> connections currently joined to its room
    rooms: HashMap<ConversationId, HashSet<ConnectionId>>,
    /// connection -> conversations it has joined
    joined: HashMap<ConnectionId, HashSet<ConversationId>>,
}

/// Process-wide room membership table. Rebuilt empty on restart.
#[derive(Default)]
pub struct InMemoryRoomRegistry {
    inner: Mutex<Memberships>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(&self, conversation_id: ConversationId, connection_id: ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner
            .rooms
            .entry(conversation_id)
            .or_default()
            .insert(connection_id);
        inner
            .joined
            .entry(connection_id)
            .or_default()
            .insert(conversation_id);
        tracing::debug!(
            "Connection {} joined room for conversation {}",
            connection_id,
            conversation_id
        );
    }

    async fn leave(&self, conversation_id: ConversationId, connection_id: ConnectionId) {
        let mut inner = self.inner.lock().await;
        if let Some(members) = inner.rooms.get_mut(&conversation_id) {
            members.remove(&connection_id);
            if members.is_empty() {
                inner.rooms.remove(&conversation_id);
            }
        }
        if let Some(rooms) = inner.joined.get_mut(&connection_id) {
            rooms.remove(&conversation_id);
            if rooms.is_empty() {
                inner.joined.remove(&connection_id);
            }
        }
    }

    async fn members(&self, conversation_id: ConversationId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        inner
            .rooms
            .get(&conversation_id)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    async fn remove_connection(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.lock().await;
        let Some(rooms) = inner.joined.remove(&connection_id) else {
            return;
        };
        for conversation_id in rooms {
            if let Some(members) = inner.rooms.get_mut(&conversation_id) {
                members.remove(&connection_id);
                if members.is_empty() {
                    inner.rooms.remove(&conversation_id);
                }
            }
        }
        tracing::debug!("Connection {} removed from all rooms", connection_id);
    }
}
