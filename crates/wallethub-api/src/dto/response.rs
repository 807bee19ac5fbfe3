//! Response DTOs.

use serde::{Deserialize, Serialize};

use wallethub_realtime::metrics::MetricsSnapshot;

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `ok` when every dependency is reachable, `degraded` otherwise.
    pub status: String,
    /// Database reachability.
    pub database: String,
    /// Endpoint role (`chat` or `notify`).
    pub realtime_mode: String,
    /// Currently registered WebSocket connections.
    pub ws_connections: usize,
    /// Realtime engine counters.
    pub realtime: MetricsSnapshot,
}
