//! Inbound and outbound WebSocket message type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wallethub_entity::chat::ChatMessage;

/// Notice broadcast whenever a wallet is created over HTTP.
pub const WALLET_CREATED_NOTICE: &str = "New wallet created!";

/// Chat frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChat {
    /// Sender display name.
    pub username: String,
    /// Message text.
    pub message: String,
}

/// Chat frame sent to clients, stamped by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFrame {
    /// Sender display name.
    pub username: String,
    /// Message text.
    pub message: String,
    /// Server-assigned send time.
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for ChatFrame {
    fn from(msg: ChatMessage) -> Self {
        Self {
            username: msg.username,
            message: msg.message,
            timestamp: msg.timestamp,
        }
    }
}

/// A message destined for every registered connection.
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastMessage {
    /// Relayed chat message, encoded as a JSON object.
    Chat(ChatFrame),
    /// Server notice, sent as the raw text.
    Notice(String),
}

impl BroadcastMessage {
    /// Stamp an inbound chat frame with the current time.
    pub fn chat(inbound: InboundChat) -> Self {
        Self::Chat(ChatFrame {
            username: inbound.username,
            message: inbound.message,
            timestamp: Utc::now(),
        })
    }

    /// Build a plain-text notice.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::Notice(text.into())
    }
}
