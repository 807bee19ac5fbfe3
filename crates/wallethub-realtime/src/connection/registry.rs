//! Connection registry: the authoritative set of open connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId};

/// Set of currently open WebSocket connections.
///
/// Every read and write goes through one mutex, held only for the map
/// operation itself. Callers iterate over [`snapshot`](Self::snapshot)
/// copies, so no lock is ever held across a send.
///
/// Once [`close_all`](Self::close_all) has run the registry is sealed and
/// refuses new members.
#[derive(Debug)]
pub struct ConnectionRegistry {
    members: Mutex<HashMap<ConnectionId, Arc<ConnectionHandle>>>,
    sealed: AtomicBool,
    metrics: Arc<RealtimeMetrics>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            sealed: AtomicBool::new(false),
            metrics,
        }
    }

    /// Adds a connection. Returns `false` if that identity was already
    /// registered or the registry is sealed, in which case nothing changes.
    pub async fn register(&self, handle: Arc<ConnectionHandle>) -> bool {
        let conn_id = handle.id;
        let inserted = {
            let mut members = self.members.lock().await;
            if self.sealed.load(Ordering::Acquire) {
                debug!(conn_id = %conn_id, "Registration refused, registry is closed");
                return false;
            }
            if members.contains_key(&conn_id) {
                false
            } else {
                members.insert(conn_id, handle);
                true
            }
        };

        if inserted {
            self.metrics.connection_opened();
            info!(conn_id = %conn_id, "WebSocket connection registered");
        } else {
            debug!(conn_id = %conn_id, "Duplicate registration ignored");
        }
        inserted
    }

    /// Returns `true` once [`close_all`](Self::close_all) has run.
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Removes a connection and closes it.
    ///
    /// Returns `true` only for the call that actually removed the entry, so
    /// the read-error path and a failed fan-out send may both call this
    /// safely.
    pub async fn unregister(&self, conn_id: &ConnectionId) -> bool {
        let removed = self.members.lock().await.remove(conn_id);

        match removed {
            Some(handle) => {
                handle.close();
                self.metrics.connection_closed();
                let lifetime = chrono::Utc::now() - handle.connected_at;
                info!(
                    conn_id = %conn_id,
                    lifetime_ms = lifetime.num_milliseconds(),
                    "WebSocket connection unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Point-in-time copy of the current members.
    pub async fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.members.lock().await.values().cloned().collect()
    }

    /// Checks whether a connection is registered.
    pub async fn contains(&self, conn_id: &ConnectionId) -> bool {
        self.members.lock().await.contains_key(conn_id)
    }

    /// Returns the number of registered connections.
    pub async fn len(&self) -> usize {
        self.members.lock().await.len()
    }

    /// Returns `true` when no connection is registered.
    pub async fn is_empty(&self) -> bool {
        self.members.lock().await.is_empty()
    }

    /// Removes and closes every connection, then seals the registry.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<Arc<ConnectionHandle>> = {
            let mut members = self.members.lock().await;
            self.sealed.store(true, Ordering::Release);
            members.drain().map(|(_, handle)| handle).collect()
        };

        for handle in &drained {
            handle.close();
            self.metrics.connection_closed();
        }

        info!(count = drained.len(), "All connections closed");
        drained.len()
    }
}
