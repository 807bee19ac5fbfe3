//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    messages_received: AtomicU64,
    broadcasts: AtomicU64,
    frames_delivered: AtomicU64,
    frames_dropped: AtomicU64,
    persist_failures: AtomicU64,
    history_failures: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connection joining the registry.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a connection leaving the registry.
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one chat frame accepted from a peer.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed fan-out.
    pub fn broadcast_completed(&self, delivered: u64, dropped: u64) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.frames_delivered.fetch_add(delivered, Ordering::Relaxed);
        self.frames_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Record a chat message that was broadcast without being stored.
    pub fn persist_failed(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed history fetch.
    pub fn history_failed(&self) {
        self.history_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_closed: closed,
            connections_active: opened.saturating_sub(closed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            history_failures: self.history_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever registered
    pub connections_opened: u64,
    /// Total connections unregistered
    pub connections_closed: u64,
    /// Currently registered connections
    pub connections_active: u64,
    /// Chat frames accepted from peers
    pub messages_received: u64,
    /// Messages fanned out
    pub broadcasts: u64,
    /// Frames handed to peers
    pub frames_delivered: u64,
    /// Frames that failed and evicted their peer
    pub frames_dropped: u64,
    /// Chat messages that could not be persisted
    pub persist_failures: u64,
    /// History fetches that failed
    pub history_failures: u64,
}
