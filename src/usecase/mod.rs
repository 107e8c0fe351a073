//! Use-case layer: one struct per operation, depending only on the
//! domain traits.

pub mod error;

mod disconnect;
mod get_messages;
mod join_conversation;
mod list_users;
mod resolve_conversation;
mod seed_users;
mod send_message;

pub use disconnect::DisconnectUseCase;
pub use error::{
    GetMessagesError, JoinConversationError, ResolveConversationError, SeedUsersError,
    SendMessageError,
};
pub use get_messages::GetMessagesUseCase;
pub use join_conversation::JoinConversationUseCase;
pub use list_users::ListUsersUseCase;
pub use resolve_conversation::ResolveConversationUseCase;
pub use seed_users::SeedUsersUseCase;
pub use send_message::SendMessageUseCase;
