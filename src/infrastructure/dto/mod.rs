//! Wire-format DTOs for the HTTP and WebSocket surfaces.
//!
//! Domain entities never cross the wire directly; handlers convert them
//! into these serde types. Timestamps are rendered as RFC 3339 UTC.

pub mod http;
pub mod websocket;

use serde::Serialize;

use crate::{common::time::format_timestamp, domain::Message};

/// One message as both surfaces render it: in REST history responses and
/// inside `chat_history` WebSocket events.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageDto {
    pub id: i64,
    pub sender: String,
    pub text: String,
    pub created_at: String,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            sender: message.sender_id.as_str().to_string(),
            text: message.text.clone(),
            created_at: format_timestamp(&message.created_at),
        }
    }
}
