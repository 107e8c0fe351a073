//! Room registry implementations.

mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
