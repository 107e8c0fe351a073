//! Event DTOs for the WebSocket surface.
//!
//! Every frame is a JSON object tagged by `type`. Inbound events come
//! from clients; outbound events are emitted by the server. The protocol
//! has no error acknowledgment: a malformed or rejected inbound event is
//! logged and dropped, never answered.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

use super::MessageDto;

/// Events a client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join the room of a conversation; the server answers with
    /// `chat_history` to this connection only.
    JoinConversation {
        conversation_id: i64,
        user_id: String,
    },
    /// Persist a message and broadcast `new_message` to the whole room.
    SendMessage {
        conversation_id: i64,
        sender_id: String,
        text: String,
    },
}

/// `chat_history` event: the recent-message snapshot sent to a joining
/// connection, oldest first.
#[derive(Debug, Serialize)]
pub struct ChatHistoryEvent {
    pub r#type: &'static str,
    pub conversation_id: i64,
    pub messages: Vec<MessageDto>,
}

impl ChatHistoryEvent {
    pub fn new(conversation_id: i64, messages: &[Message]) -> Self {
        Self {
            r#type: "chat_history",
            conversation_id,
            messages: messages.iter().map(MessageDto::from).collect(),
        }
    }
}

/// `new_message` event: one persisted message, fanned out to every room
/// member. Receiving it is the sender's only acknowledgment.
#[derive(Debug, Serialize)]
pub struct NewMessageEvent {
    pub r#type: &'static str,
    pub id: i64,
    pub conversation_id: i64,
    pub sender: String,
    pub text: String,
    pub created_at: String,
}

impl NewMessageEvent {
    pub fn new(message: &Message) -> Self {
        let dto = MessageDto::from(message);
        Self {
            r#type: "new_message",
            id: dto.id,
            conversation_id: message.conversation_id.value(),
            sender: dto.sender,
            text: dto.text,
            created_at: dto.created_at,
        }
    }
}
