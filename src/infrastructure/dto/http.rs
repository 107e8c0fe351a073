//! Request/response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::{Conversation, User};

use super::MessageDto;

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserDto>,
}

/// Query parameters for `GET /conversations/direct`. Both are optional at
/// the serde level so the handler can answer a missing parameter with a
/// structured 400 instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct DirectConversationQuery {
    pub me: Option<String>,
    pub other: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub conversation_id: i64,
    pub user1_id: String,
    pub user2_id: String,
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            conversation_id: conversation.id.value(),
            user1_id: conversation.pair.low().as_str().to_string(),
            user2_id: conversation.pair.high().as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub conversation_id: i64,
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUserDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedUsersRequest {
    pub users: Vec<SeedUserDto>,
}

#[derive(Debug, Serialize)]
pub struct SeedUsersResponse {
    pub seeded: usize,
}
