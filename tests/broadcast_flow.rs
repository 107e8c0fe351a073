//! End-to-end flow tests over the wired-up core: real SQLite store
//! (in-memory), real registry and pusher, with connections simulated as
//! registered outbound channels.

use std::sync::Arc;

use dm_relay::{
    common::time::SystemClock,
    domain::{ConnectionId, MessagePusher, RoomRegistry},
    infrastructure::{
        dto::websocket::NewMessageEvent,
        message_pusher::WebSocketMessagePusher,
        registry::InMemoryRoomRegistry,
        repository::SqliteChatRepository,
    },
    usecase::{
        DisconnectUseCase, GetMessagesUseCase, JoinConversationUseCase, ResolveConversationUseCase,
        SendMessageError, SendMessageUseCase,
    },
};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::mpsc::{self, UnboundedReceiver, error::TryRecvError};

struct Harness {
    registry: Arc<InMemoryRoomRegistry>,
    pusher: Arc<WebSocketMessagePusher>,
    resolve: ResolveConversationUseCase,
    join: JoinConversationUseCase,
    send: SendMessageUseCase,
    disconnect: DisconnectUseCase,
    get_messages: GetMessagesUseCase,
}

impl Harness {
    async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repository = Arc::new(SqliteChatRepository::new(pool, Arc::new(SystemClock)));
        repository.migrate().await.unwrap();
        let registry = Arc::new(InMemoryRoomRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());

        Self {
            resolve: ResolveConversationUseCase::new(repository.clone()),
            join: JoinConversationUseCase::new(repository.clone(), registry.clone()),
            send: SendMessageUseCase::new(repository.clone(), registry.clone(), pusher.clone()),
            disconnect: DisconnectUseCase::new(registry.clone(), pusher.clone()),
            get_messages: GetMessagesUseCase::new(repository),
            registry,
            pusher,
        }
    }

    /// Open a simulated connection: an id plus the receiving end of its
    /// outbound channel.
    async fn connect(&self) -> (ConnectionId, UnboundedReceiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register(connection_id, tx).await;
        (connection_id, rx)
    }

    /// Persist and fan out, the way the WebSocket handler does.
    async fn send_message(&self, conversation_id: i64, sender: &str, text: &str) {
        let (message, targets) = self.send.execute(conversation_id, sender, text).await.unwrap();
        let payload = serde_json::to_string(&NewMessageEvent::new(&message)).unwrap();
        self.send.broadcast(targets, &payload).await;
    }
}

fn expect_one_event(rx: &mut UnboundedReceiver<String>) -> serde_json::Value {
    let payload = rx.try_recv().expect("expected exactly one event");
    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    serde_json::from_str(&payload).unwrap()
}

#[tokio::test]
async fn pair_resolution_is_canonical_and_stable() {
    let h = Harness::new().await;

    let first = h.resolve.execute("a", "b").await.unwrap();
    assert_eq!(first.id.value(), 1);
    assert_eq!(first.pair.low().as_str(), "a");
    assert_eq!(first.pair.high().as_str(), "b");

    // The reversed pair resolves to the very same conversation.
    let second = h.resolve.execute("b", "a").await.unwrap();
    assert_eq!(second.id.value(), 1);
}

#[tokio::test]
async fn first_message_is_stored_and_broadcast_with_id_one() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let (connection, mut rx) = h.connect().await;
    let history = h.join.execute(conversation.id.value(), connection).await.unwrap();
    assert!(history.is_empty());

    h.send_message(conversation.id.value(), "a", "hi").await;

    let event = expect_one_event(&mut rx);
    assert_eq!(event["type"], "new_message");
    assert_eq!(event["id"], 1);
    assert_eq!(event["conversation_id"], 1);
    assert_eq!(event["sender"], "a");
    assert_eq!(event["text"], "hi");

    let stored = h.get_messages.execute(conversation.id.value(), None).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, 1);
    assert_eq!(stored[0].text, "hi");
}

#[tokio::test]
async fn both_room_members_receive_the_identical_event() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let (alice, mut alice_rx) = h.connect().await;
    let (bob, mut bob_rx) = h.connect().await;
    h.join.execute(conversation.id.value(), alice).await.unwrap();
    h.join.execute(conversation.id.value(), bob).await.unwrap();

    h.send_message(conversation.id.value(), "a", "hello").await;

    let alice_event = expect_one_event(&mut alice_rx);
    let bob_event = expect_one_event(&mut bob_rx);
    assert_eq!(alice_event, bob_event);
    assert_eq!(alice_event["text"], "hello");
}

#[tokio::test]
async fn connections_outside_the_room_receive_nothing() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let other = h.resolve.execute("c", "d").await.unwrap();
    let (member, mut member_rx) = h.connect().await;
    let (outsider, mut outsider_rx) = h.connect().await;
    h.join.execute(conversation.id.value(), member).await.unwrap();
    h.join.execute(other.id.value(), outsider).await.unwrap();

    h.send_message(conversation.id.value(), "a", "private").await;

    expect_one_event(&mut member_rx);
    assert_eq!(outsider_rx.try_recv().unwrap_err(), TryRecvError::Empty);
}

#[tokio::test]
async fn rejoining_replays_what_was_broadcast() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let (alice, _alice_rx) = h.connect().await;
    h.join.execute(conversation.id.value(), alice).await.unwrap();
    h.send_message(conversation.id.value(), "a", "first").await;
    h.send_message(conversation.id.value(), "b", "second").await;

    // A fresh connection joins later and gets the same messages as a
    // history snapshot, oldest first.
    let (late, _late_rx) = h.connect().await;
    let history = h.join.execute(conversation.id.value(), late).await.unwrap();

    let texts: Vec<_> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    let ids: Vec<_> = history.iter().map(|m| m.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn blank_send_persists_and_broadcasts_nothing() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let (connection, mut rx) = h.connect().await;
    h.join.execute(conversation.id.value(), connection).await.unwrap();

    let blank_text = h.send.execute(conversation.id.value(), "a", "   ").await;
    assert!(matches!(blank_text, Err(SendMessageError::EmptyText)));
    let blank_sender = h.send.execute(conversation.id.value(), " ", "hi").await;
    assert!(matches!(blank_sender, Err(SendMessageError::MissingSender)));

    assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    let stored = h.get_messages.execute(conversation.id.value(), None).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn disconnect_stops_delivery_to_the_departed_connection() {
    let h = Harness::new().await;
    let conversation = h.resolve.execute("a", "b").await.unwrap();
    let (staying, mut staying_rx) = h.connect().await;
    let (leaving, mut leaving_rx) = h.connect().await;
    h.join.execute(conversation.id.value(), staying).await.unwrap();
    h.join.execute(conversation.id.value(), leaving).await.unwrap();

    h.disconnect.execute(leaving).await;
    h.send_message(conversation.id.value(), "a", "still here?").await;

    expect_one_event(&mut staying_rx);
    assert_eq!(leaving_rx.try_recv().unwrap_err(), TryRecvError::Disconnected);
    assert!(h.registry.members(conversation.id).await.len() == 1);
}

#[tokio::test]
async fn concurrent_first_time_resolution_creates_one_conversation() {
    let h = Harness::new().await;
    let resolve = Arc::new(h.resolve);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let resolve = resolve.clone();
        handles.push(tokio::spawn(
            async move { resolve.execute("a", "b").await },
        ));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id.value());
    }
    ids.dedup();
    assert_eq!(ids, vec![1]);
}
