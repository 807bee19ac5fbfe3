//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use wallethub_core::config::RealtimeConfig;
use wallethub_core::error::AppError;
use wallethub_core::result::AppResult;

use crate::broadcast::router::BroadcastRouter;
use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::registry::ConnectionRegistry;
use crate::history::replay::HistoryReplay;
use crate::history::store::MessageStore;
use crate::metrics::RealtimeMetrics;

/// How long shutdown waits for the drain task to finish.
const DRAIN_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Central real-time engine shared by the HTTP handlers and the gateway.
pub struct RealtimeEngine {
    /// Live connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Broadcast queue and fan-out.
    pub router: Arc<BroadcastRouter>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
    history: HistoryReplay,
    shutdown_tx: watch::Sender<bool>,
    drain_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("mode", &self.config.mode)
            .finish()
    }
}

impl RealtimeEngine {
    /// Build the engine and spawn its broadcast drain.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: RealtimeConfig, store: Arc<dyn MessageStore>) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(metrics.clone()));
        let persist = config.persist_chat.then(|| store.clone());
        let (router, drain) = BroadcastRouter::new(
            registry.clone(),
            persist,
            Duration::from_millis(config.persist_timeout_ms),
            metrics.clone(),
            config.queue_capacity,
        );
        let history = HistoryReplay::new(store, config.history_limit);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let drain_task = tokio::spawn(drain.run(shutdown_rx));

        info!(
            mode = ?config.mode,
            queue_capacity = config.queue_capacity,
            outbound_buffer = config.outbound_buffer_size,
            "Real-time engine initialized"
        );

        Self {
            registry,
            router,
            metrics,
            config,
            history,
            shutdown_tx,
            drain_task: Mutex::new(Some(drain_task)),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// History replay for new connections.
    pub fn history(&self) -> &HistoryReplay {
        &self.history
    }

    /// Create a connection handle and register it for broadcasts.
    ///
    /// Fails with `ServiceUnavailable` once shutdown has started.
    pub async fn connect(&self) -> AppResult<(Arc<ConnectionHandle>, mpsc::Receiver<String>)> {
        if self.is_shutting_down() {
            return Err(AppError::service_unavailable("Real-time engine is shutting down"));
        }

        let (handle, rx) = ConnectionHandle::new(self.config.outbound_buffer_size);
        let handle = Arc::new(handle);
        if !self.registry.register(handle.clone()).await {
            handle.close();
            return Err(AppError::service_unavailable("Real-time engine is shutting down"));
        }
        Ok((handle, rx))
    }

    /// Remove a connection. Safe to call more than once.
    pub async fn disconnect(&self, conn_id: &ConnectionId) -> bool {
        self.registry.unregister(conn_id).await
    }

    /// Returns `true` once shutdown has started.
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Stop the drain and close every connection.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        self.shutdown_tx.send_replace(true);
        let closed = self.registry.close_all().await;

        if let Some(task) = self.drain_task.lock().await.take() {
            match tokio::time::timeout(DRAIN_STOP_TIMEOUT, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Broadcast drain task failed"),
                Err(_) => {
                    return Err(AppError::internal(
                        "Timed out waiting for the broadcast drain to stop",
                    ));
                }
            }
        }

        info!(closed, "Real-time engine shut down");
        Ok(())
    }
}
