//! Infrastructure layer: concrete implementations of the domain
//! interfaces plus the wire-format DTOs.

pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
