//! JSON serialization for WebSocket frames.

use super::types::{BroadcastMessage, ChatFrame, InboundChat};

/// Encode a broadcast message as a text frame.
pub fn encode_broadcast(msg: &BroadcastMessage) -> Result<String, serde_json::Error> {
    match msg {
        BroadcastMessage::Chat(frame) => encode_chat(frame),
        BroadcastMessage::Notice(text) => Ok(text.clone()),
    }
}

/// Encode a single chat frame.
pub fn encode_chat(frame: &ChatFrame) -> Result<String, serde_json::Error> {
    serde_json::to_string(frame)
}

/// Deserialize an inbound chat frame from JSON
pub fn decode_inbound(text: &str) -> Result<InboundChat, serde_json::Error> {
    serde_json::from_str(text)
}
