//! Broadcast router: one FIFO queue, one drain task, best-effort fan-out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use wallethub_core::error::AppError;
use wallethub_core::result::AppResult;

use crate::connection::handle::ConnectionId;
use crate::connection::registry::ConnectionRegistry;
use crate::history::store::MessageStore;
use crate::message::serializer::encode_broadcast;
use crate::message::types::BroadcastMessage;
use crate::metrics::RealtimeMetrics;

/// Outcome of delivering one message to the registry snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Connections the frame was handed to.
    pub delivered: usize,
    /// Connections that failed and were unregistered.
    pub dropped: Vec<ConnectionId>,
}

/// Accepts messages from connections and HTTP handlers and fans them out.
///
/// Producers enqueue with [`publish`](Self::publish); a single
/// [`BroadcastDrain`] consumes the queue, so every peer sees messages in
/// enqueue order.
pub struct BroadcastRouter {
    registry: Arc<ConnectionRegistry>,
    queue: mpsc::Sender<BroadcastMessage>,
    store: Option<Arc<dyn MessageStore>>,
    persist_timeout: Duration,
    metrics: Arc<RealtimeMetrics>,
}

impl std::fmt::Debug for BroadcastRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastRouter")
            .field("persisting", &self.store.is_some())
            .finish()
    }
}

impl BroadcastRouter {
    /// Create a router and the drain that must be run for it.
    ///
    /// When `store` is set, chat messages are persisted before fan-out. Each
    /// insert gets at most `persist_timeout`; past that the message goes out
    /// unstored.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        store: Option<Arc<dyn MessageStore>>,
        persist_timeout: Duration,
        metrics: Arc<RealtimeMetrics>,
        queue_capacity: usize,
    ) -> (Arc<Self>, BroadcastDrain) {
        let (queue, receiver) = mpsc::channel(queue_capacity.max(1));
        let router = Arc::new(Self {
            registry,
            queue,
            store,
            persist_timeout,
            metrics,
        });
        let drain = BroadcastDrain {
            router: Arc::clone(&router),
            receiver,
        };
        (router, drain)
    }

    /// Enqueue a message for fan-out, waiting for queue capacity.
    pub async fn publish(&self, msg: BroadcastMessage) -> AppResult<()> {
        self.queue
            .send(msg)
            .await
            .map_err(|_| AppError::service_unavailable("Broadcast queue is closed"))
    }

    /// Enqueue a plain-text notice.
    pub async fn notify(&self, text: impl Into<String>) -> AppResult<()> {
        self.publish(BroadcastMessage::notice(text)).await
    }

    /// Persist (chat only, if enabled), encode and fan out one message.
    pub async fn deliver(&self, msg: BroadcastMessage) -> FanOutReport {
        let msg = self.persist(msg).await;

        let frame = match encode_broadcast(&msg) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast message");
                return FanOutReport::default();
            }
        };

        self.fan_out(&frame).await
    }

    /// Hand `frame` to every connection in a registry snapshot.
    ///
    /// A connection that cannot take the frame is unregistered on the spot;
    /// the remaining connections still receive it.
    pub async fn fan_out(&self, frame: &str) -> FanOutReport {
        let members = self.registry.snapshot().await;
        let mut report = FanOutReport::default();

        for conn in &members {
            match conn.try_send(frame.to_owned()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(conn_id = %conn.id, error = %e, "Broadcast send failed, dropping connection");
                    report.dropped.push(conn.id);
                }
            }
        }

        for conn_id in &report.dropped {
            self.registry.unregister(conn_id).await;
        }

        self.metrics
            .broadcast_completed(report.delivered as u64, report.dropped.len() as u64);
        debug!(
            recipients = members.len(),
            delivered = report.delivered,
            dropped = report.dropped.len(),
            "Broadcast fan-out complete"
        );

        report
    }

    async fn persist(&self, msg: BroadcastMessage) -> BroadcastMessage {
        let (Some(store), BroadcastMessage::Chat(frame)) = (&self.store, &msg) else {
            return msg;
        };

        let save = store.save(&frame.username, &frame.message, frame.timestamp);
        match tokio::time::timeout(self.persist_timeout, save).await {
            Ok(Ok(stored)) => BroadcastMessage::Chat(stored.into()),
            Ok(Err(e)) => {
                self.metrics.persist_failed();
                warn!(error = %e, username = %frame.username, "Failed to persist chat message");
                msg
            }
            Err(_) => {
                self.metrics.persist_failed();
                warn!(
                    timeout_ms = self.persist_timeout.as_millis() as u64,
                    username = %frame.username,
                    "Timed out persisting chat message"
                );
                msg
            }
        }
    }
}

/// The single consumer of a router's queue.
pub struct BroadcastDrain {
    router: Arc<BroadcastRouter>,
    receiver: mpsc::Receiver<BroadcastMessage>,
}

impl std::fmt::Debug for BroadcastDrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastDrain").finish()
    }
}

impl BroadcastDrain {
    /// Deliver queued messages until shutdown is signalled.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Broadcast drain started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                next = self.receiver.recv() => match next {
                    Some(msg) => {
                        self.router.deliver(msg).await;
                    }
                    None => break,
                },
            }
        }

        info!("Broadcast drain stopped");
    }
}
