//! # wallethub-realtime
//!
//! Real-time WebSocket engine for WalletHub. Provides:
//!
//! - A connection registry guarded by a single lock, snapshotted for fan-out
//! - A broadcast router draining one FIFO queue into every open connection
//! - Chat persistence and bounded history replay through [`MessageStore`]
//! - Engine-level counters for the health endpoint
//!
//! The socket itself is owned by the HTTP layer; this crate only sees
//! connection handles and their outbound queues.

pub mod broadcast;
pub mod connection;
pub mod history;
pub mod message;
pub mod metrics;
pub mod server;

pub use broadcast::router::{BroadcastDrain, BroadcastRouter, FanOutReport};
pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::ConnectionRegistry;
pub use history::store::{MemoryMessageStore, MessageStore};
pub use message::types::BroadcastMessage;
pub use server::RealtimeEngine;
