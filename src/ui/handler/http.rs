//! HTTP API endpoint handlers.
//!
//! Errors on this surface are structured payloads: `{"error": "..."}`
//! with a 4xx status for caller mistakes and 500 for storage failures.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    infrastructure::dto::{
        MessageDto,
        http::{
            ConversationDto, DirectConversationQuery, MessagesQuery, MessagesResponse,
            SeedUsersRequest, SeedUsersResponse, UserDto, UsersResponse,
        },
    },
    usecase::{GetMessagesError, ResolveConversationError, SeedUsersError},
};

use super::super::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn storage_error(err: impl std::fmt::Display) -> ApiError {
    tracing::error!("Storage failure on request path: {}", err);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `GET /users` — all users, ordered by name.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .list_users_usecase
        .execute()
        .await
        .map_err(storage_error)?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserDto::from).collect(),
    }))
}

/// `GET /conversations/direct?me=&other=` — resolve or lazily create the
/// direct conversation for the pair.
pub async fn direct_conversation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DirectConversationQuery>,
) -> Result<Json<ConversationDto>, ApiError> {
    let (Some(me), Some(other)) = (query.me, query.other) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "me and other query params are required",
        ));
    };

    let conversation = state
        .resolve_conversation_usecase
        .execute(&me, &other)
        .await
        .map_err(|err| match err {
            ResolveConversationError::InvalidArgument(e) => {
                api_error(StatusCode::BAD_REQUEST, e.to_string())
            }
            ResolveConversationError::Storage(e) => storage_error(e),
        })?;

    Ok(Json(ConversationDto::from(&conversation)))
}

/// `GET /conversations/{id}/messages?limit=N` — recent messages, oldest
/// first.
pub async fn get_conversation_messages(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<i64>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state
        .get_messages_usecase
        .execute(conversation_id, query.limit)
        .await
        .map_err(|err| match err {
            GetMessagesError::ConversationNotFound(id) => api_error(
                StatusCode::NOT_FOUND,
                format!("conversation {id} not found"),
            ),
            GetMessagesError::Storage(e) => storage_error(e),
        })?;

    Ok(Json(MessagesResponse {
        conversation_id,
        messages: messages.iter().map(MessageDto::from).collect(),
    }))
}

/// `POST /seed-users` — idempotent bulk upsert.
pub async fn seed_users(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeedUsersRequest>,
) -> Result<Json<SeedUsersResponse>, ApiError> {
    let users = request
        .users
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let seeded = state
        .seed_users_usecase
        .execute(users)
        .await
        .map_err(|err| match err {
            SeedUsersError::InvalidArgument(e) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            SeedUsersError::Storage(e) => storage_error(e),
        })?;

    Ok(Json(SeedUsersResponse { seeded }))
}
