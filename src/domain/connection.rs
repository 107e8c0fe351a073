//! Live connection identity and the per-connection outbound channel.

use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier for one live WebSocket connection.
///
/// Distinct from [`super::UserId`]: the same user may hold several
/// connections, and each one joins rooms and receives broadcasts
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound channel for one connection. The dispatcher writes serialized
/// events here; a per-connection pusher task drains the channel into the
/// WebSocket, so a slow receiver never blocks the sender path.
pub type PusherChannel = mpsc::UnboundedSender<String>;
