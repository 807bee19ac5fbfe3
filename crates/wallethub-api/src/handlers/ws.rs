//! WebSocket upgrade handler and per-connection gateway.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wallethub_core::config::RealtimeMode;
use wallethub_realtime::connection::ConnectionHandle;
use wallethub_realtime::message::BroadcastMessage;
use wallethub_realtime::message::serializer::decode_inbound;
use wallethub_realtime::server::RealtimeEngine;

use crate::state::AppState;

/// How long teardown waits for the writer to flush its close frame.
const WRITER_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on each history frame written during replay.
const REPLAY_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a connection left the `Open` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    /// Peer sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the socket failed.
    ReadError,
    /// A text frame was not a `{username, message}` object.
    MalformedFrame,
    /// No frame arrived within the idle timeout.
    IdleTimeout,
    /// The handle was closed elsewhere: failed fan-out, writer error or shutdown.
    Closed,
    /// The broadcast queue is gone.
    RouterStopped,
}

enum Inbound {
    Frame(Message),
    End,
    Error(axum::Error),
    Idle,
}

/// GET /ws
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state.realtime, socket))
}

/// Runs one connection from upgrade to close.
async fn handle_ws_connection(engine: Arc<RealtimeEngine>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    if engine.config().history_replay && !replay_history(&engine, &mut ws_tx).await {
        debug!("Peer went away during history replay");
        return;
    }

    let (handle, outbound_rx) = match engine.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            debug!(error = %e, "Refusing WebSocket connection");
            let _ = ws_tx.send(Message::Close(None)).await;
            let _ = ws_tx.close().await;
            return;
        }
    };
    let conn_id = handle.id;
    info!(conn_id = %conn_id, "WebSocket connection established");

    let writer = tokio::spawn(write_loop(handle.clone(), ws_tx, outbound_rx));

    let idle = match engine.config().idle_timeout_seconds {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let reason = loop {
        let inbound = tokio::select! {
            _ = handle.closed() => break CloseReason::Closed,
            inbound = read_next(&mut ws_rx, idle) => inbound,
        };

        match inbound {
            Inbound::Frame(Message::Text(text)) => {
                if engine.config().mode == RealtimeMode::Notify {
                    debug!(conn_id = %conn_id, "Ignoring inbound frame in notify mode");
                    continue;
                }

                let chat = match decode_inbound(text.as_str()) {
                    Ok(chat) => chat,
                    Err(e) => {
                        warn!(conn_id = %conn_id, error = %e, "Undecodable chat frame");
                        break CloseReason::MalformedFrame;
                    }
                };

                engine.metrics.message_received();
                if engine
                    .router
                    .publish(BroadcastMessage::chat(chat))
                    .await
                    .is_err()
                {
                    break CloseReason::RouterStopped;
                }
            }
            Inbound::Frame(Message::Close(_)) | Inbound::End => break CloseReason::PeerClosed,
            Inbound::Frame(_) => {}
            Inbound::Error(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket read error");
                break CloseReason::ReadError;
            }
            Inbound::Idle => break CloseReason::IdleTimeout,
        }
    };

    engine.disconnect(&conn_id).await;
    if tokio::time::timeout(WRITER_STOP_TIMEOUT, writer).await.is_err() {
        debug!(conn_id = %conn_id, "Writer did not stop in time");
    }

    info!(conn_id = %conn_id, reason = ?reason, "WebSocket connection closed");
}

/// Sends recent chat history to a peer that is not yet registered.
///
/// Returns `false` if the socket failed or stalled; a failed history fetch
/// is logged and the connection carries on.
async fn replay_history(
    engine: &RealtimeEngine,
    ws_tx: &mut SplitSink<WebSocket, Message>,
) -> bool {
    let frames = match engine.history().frames().await {
        Ok(frames) => frames,
        Err(e) => {
            engine.metrics.history_failed();
            warn!(error = %e, "Failed to load chat history for replay");
            return true;
        }
    };

    send_frames(ws_tx, frames, REPLAY_WRITE_TIMEOUT).await
}

/// Writes each frame, giving up on the first error or on a write that takes
/// longer than `limit`.
async fn send_frames<S>(sink: &mut S, frames: Vec<String>, limit: Duration) -> bool
where
    S: Sink<Message> + Unpin,
{
    for frame in frames {
        match tokio::time::timeout(limit, sink.send(Message::Text(frame.into()))).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return false,
            Err(_) => {
                warn!(timeout_secs = limit.as_secs(), "History replay write timed out");
                return false;
            }
        }
    }
    true
}

async fn read_next(ws_rx: &mut SplitStream<WebSocket>, idle: Option<Duration>) -> Inbound {
    let next = match idle {
        Some(limit) => match tokio::time::timeout(limit, ws_rx.next()).await {
            Ok(next) => next,
            Err(_) => return Inbound::Idle,
        },
        None => ws_rx.next().await,
    };

    match next {
        Some(Ok(msg)) => Inbound::Frame(msg),
        Some(Err(e)) => Inbound::Error(e),
        None => Inbound::End,
    }
}

/// Drains the connection's outbound queue into the socket.
///
/// Exits when the handle is closed or a write fails, and always leaves the
/// handle closed so the read loop stops too.
async fn write_loop(
    handle: Arc<ConnectionHandle>,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<String>,
) {
    loop {
        tokio::select! {
            _ = handle.closed() => break,
            next = outbound_rx.recv() => match next {
                Some(frame) => {
                    if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                        warn!(conn_id = %handle.id, error = %e, "WebSocket write failed");
                        break;
                    }
                }
                None => break,
            },
        }
    }

    handle.close();
    let _ = ws_tx.send(Message::Close(None)).await;
    let _ = ws_tx.close().await;
}
