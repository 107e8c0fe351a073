//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    direct_conversation, get_conversation_messages, health_check, list_users, seed_users,
};
pub use websocket::websocket_handler;
