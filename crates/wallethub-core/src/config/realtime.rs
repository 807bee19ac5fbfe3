//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Role of the `/ws` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealtimeMode {
    /// Inbound `{username, message}` frames are relayed to every peer.
    #[default]
    Chat,
    /// Inbound frames are ignored; peers only receive server notices.
    Notify,
}

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Endpoint role.
    #[serde(default)]
    pub mode: RealtimeMode,
    /// Capacity of the shared broadcast queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Capacity of each connection's outbound queue. A peer whose queue is
    /// full during fan-out is dropped.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Persist chat messages before broadcasting them.
    #[serde(default = "default_true")]
    pub persist_chat: bool,
    /// Upper bound on one chat insert. A message whose insert takes longer
    /// is broadcast with its local timestamp instead.
    #[serde(default = "default_persist_timeout_ms")]
    pub persist_timeout_ms: u64,
    /// Replay recent chat history to newly connected peers.
    #[serde(default = "default_true")]
    pub history_replay: bool,
    /// Maximum number of messages replayed or served by the history endpoint.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Close connections that send nothing for this many seconds (0 disables).
    #[serde(default)]
    pub idle_timeout_seconds: u64,
    /// Broadcast a notice whenever a wallet is created.
    #[serde(default = "default_true")]
    pub notify_on_wallet_create: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            mode: RealtimeMode::default(),
            queue_capacity: default_queue_capacity(),
            outbound_buffer_size: default_outbound_buffer(),
            persist_chat: true,
            persist_timeout_ms: default_persist_timeout_ms(),
            history_replay: true,
            history_limit: default_history_limit(),
            idle_timeout_seconds: 0,
            notify_on_wallet_create: true,
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_persist_timeout_ms() -> u64 {
    500
}

fn default_history_limit() -> usize {
    100
}

fn default_true() -> bool {
    true
}
