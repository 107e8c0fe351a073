//! Direct-messaging relay library.
//!
//! Clients open a WebSocket, join the room of a two-party conversation,
//! and exchange text messages that are persisted to SQLite and broadcast
//! to every connection in the room. A small HTTP API handles user
//! listing, conversation resolution, history reads, seeding, and health.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
