//! WebSocket message types and their JSON encoding.

pub mod serializer;
pub mod types;

pub use types::{BroadcastMessage, ChatFrame, InboundChat, WALLET_CREATED_NOTICE};
