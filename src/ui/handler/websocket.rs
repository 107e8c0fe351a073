//! WebSocket connection handler: the event-stream surface.
//!
//! Each connection gets an unbounded outbound channel and a pusher task
//! draining it into the socket, so broadcast fan-out never waits on a
//! slow receiver. Inbound events are handled in this connection's task;
//! rejected events are logged and dropped without a reply, because the
//! protocol has no error-acknowledgment channel.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{ChatHistoryEvent, ClientEvent, NewMessageEvent},
    usecase::SendMessageError,
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();

    // Create the outbound channel and register it before the upgrade so
    // the connection can be a broadcast target as soon as it joins a
    // room.
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register(connection_id, tx).await;

    tracing::info!("Connection {} established", connection_id);

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx))
}

/// Spawns the task that drains the outbound channel into the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();
    let push_task = pusher_loop(rx, sender);

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on connection {}: {}", connection_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_event(&state, connection_id, text.as_str()).await,
            Message::Close(_) => break,
            // Pings are answered by axum; binary frames are not part of
            // the protocol.
            _ => {}
        }
    }

    // Remove all room memberships before dropping the channel so no
    // fan-out selects a severed connection.
    state.disconnect_usecase.execute(connection_id).await;
    push_task.abort();
}

async fn handle_event(state: &Arc<AppState>, connection_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Connection {} sent an unparseable event, dropping: {}",
                connection_id,
                e
            );
            return;
        }
    };

    match event {
        ClientEvent::JoinConversation {
            conversation_id,
            user_id,
        } => {
            match state
                .join_conversation_usecase
                .execute(conversation_id, connection_id)
                .await
            {
                Ok(history) => {
                    tracing::info!(
                        "User {} joined conversation {} on connection {}",
                        user_id,
                        conversation_id,
                        connection_id
                    );
                    let event = ChatHistoryEvent::new(conversation_id, &history);
                    push_event(state, connection_id, &event).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Join of conversation {} on connection {} failed: {}",
                        conversation_id,
                        connection_id,
                        e
                    );
                }
            }
        }
        ClientEvent::SendMessage {
            conversation_id,
            sender_id,
            text,
        } => {
            match state
                .send_message_usecase
                .execute(conversation_id, &sender_id, &text)
                .await
            {
                Ok((message, targets)) => {
                    let event = NewMessageEvent::new(&message);
                    let Ok(payload) = serde_json::to_string(&event) else {
                        tracing::error!("Failed to serialize new_message event");
                        return;
                    };
                    state.send_message_usecase.broadcast(targets, &payload).await;
                }
                // Blank input gets no reply; the protocol has no error frames.
                Err(SendMessageError::MissingSender | SendMessageError::EmptyText) => {
                    tracing::debug!(
                        "Dropping blank send_message from connection {}",
                        connection_id
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "send_message on conversation {} failed, nothing broadcast: {}",
                        conversation_id,
                        e
                    );
                }
            }
        }
    }
}

async fn push_event<T: serde::Serialize>(
    state: &Arc<AppState>,
    connection_id: ConnectionId,
    event: &T,
) {
    let Ok(payload) = serde_json::to_string(event) else {
        tracing::error!("Failed to serialize event for connection {}", connection_id);
        return;
    };
    if let Err(e) = state.message_pusher.push_to(connection_id, &payload).await {
        tracing::warn!("Failed to push event to connection {}: {}", connection_id, e);
    }
}
