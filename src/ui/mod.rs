//! UI layer: axum router, HTTP/WebSocket handlers, server lifecycle.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
