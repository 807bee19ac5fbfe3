//! Integration tests for the `/ws` gateway and the HTTP routes it shares a
//! listener with.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;

use wallethub_core::config::RealtimeMode;
use wallethub_core::error::AppError;
use wallethub_core::result::AppResult;
use wallethub_entity::chat::ChatMessage;
use wallethub_realtime::{MemoryMessageStore, MessageStore};

use helpers::{TestApp, expect_closed, next_json, next_text, send_chat, wait_for_stored};

/// Store whose database is always down.
struct UnreachableStore;

#[async_trait]
impl MessageStore for UnreachableStore {
    async fn save(&self, _: &str, _: &str, _: DateTime<Utc>) -> AppResult<ChatMessage> {
        Err(AppError::database("connection refused"))
    }

    async fn recent(&self, _: usize) -> AppResult<Vec<ChatMessage>> {
        Err(AppError::database("connection refused"))
    }
}

#[tokio::test]
async fn test_chat_reaches_every_client_including_sender() {
    let app = TestApp::spawn().await;
    let mut alice = app.ws_registered().await;
    let mut bob = app.ws_registered().await;

    send_chat(&mut alice, "alice", "hello bob").await;

    for client in [&mut alice, &mut bob] {
        let frame = next_json(client).await;
        assert_eq!(frame["username"], "alice");
        assert_eq!(frame["message"], "hello bob");
        assert!(frame["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_unregistered_client_misses_later_broadcasts() {
    let app = TestApp::spawn().await;
    let mut a = app.ws_registered().await;
    let mut b = app.ws_registered().await;
    let mut c = app.ws_registered().await;

    app.engine.router.notify("M").await.unwrap();
    for client in [&mut a, &mut b, &mut c] {
        assert_eq!(next_text(client).await, "M");
    }

    b.close(None).await.unwrap();
    app.wait_for_connections(2).await;

    app.engine.router.notify("M2").await.unwrap();
    assert_eq!(next_text(&mut a).await, "M2");
    assert_eq!(next_text(&mut c).await, "M2");
    assert_eq!(app.engine.metrics.snapshot().connections_closed, 1);
}

#[tokio::test]
async fn test_history_replayed_to_late_joiner_in_order() {
    let store = Arc::new(MemoryMessageStore::new());
    let app = TestApp::spawn_with(store.clone(), |_| {}).await;

    let mut alice = app.ws_registered().await;
    for text in ["one", "two", "three"] {
        send_chat(&mut alice, "alice", text).await;
    }
    wait_for_stored(&store, 3).await;

    let mut carol = app.ws().await;
    let mut replayed = Vec::new();
    for _ in 0..3 {
        replayed.push(next_json(&mut carol).await["message"].as_str().unwrap().to_owned());
    }
    assert_eq!(replayed, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_history_replay_is_capped_to_newest() {
    let store = Arc::new(MemoryMessageStore::new());
    let base = Utc::now() - Duration::minutes(10);
    for i in 1..=5 {
        store
            .save("seed", &format!("m{i}"), base + Duration::seconds(i))
            .await
            .unwrap();
    }
    let app = TestApp::spawn_with(store, |config| config.realtime.history_limit = 2).await;

    let mut client = app.ws_registered().await;
    app.engine.router.notify("live").await.unwrap();

    assert_eq!(next_json(&mut client).await["message"], "m4");
    assert_eq!(next_json(&mut client).await["message"], "m5");
    assert_eq!(next_text(&mut client).await, "live");
}

#[tokio::test]
async fn test_client_close_removes_registry_entry() {
    let app = TestApp::spawn().await;
    let mut client = app.ws_registered().await;

    client.close(None).await.unwrap();

    app.wait_for_connections(0).await;
}

#[tokio::test]
async fn test_malformed_chat_frame_closes_connection() {
    let app = TestApp::spawn().await;
    let mut bad = app.ws_registered().await;
    let mut good = app.ws_registered().await;

    bad.send(Message::text("definitely not json")).await.unwrap();

    expect_closed(&mut bad).await;
    app.wait_for_connections(1).await;

    send_chat(&mut good, "good", "still here").await;
    assert_eq!(next_json(&mut good).await["message"], "still here");
}

#[tokio::test]
async fn test_notify_mode_ignores_inbound_frames() {
    let store = Arc::new(MemoryMessageStore::new());
    let app = TestApp::spawn_with(store.clone(), |config| {
        config.realtime.mode = RealtimeMode::Notify;
    })
    .await;
    let mut client = app.ws_registered().await;

    send_chat(&mut client, "alice", "ignored").await;
    client.send(Message::text("not json either")).await.unwrap();
    app.engine.router.notify("New wallet created!").await.unwrap();

    assert_eq!(next_text(&mut client).await, "New wallet created!");
    assert!(store.is_empty().await);
    assert_eq!(app.engine.registry.len().await, 1);
}

#[tokio::test]
async fn test_store_outage_does_not_block_chat() {
    let app = TestApp::spawn_with(Arc::new(UnreachableStore), |_| {}).await;
    let mut client = app.ws_registered().await;

    send_chat(&mut client, "alice", "no db today").await;

    assert_eq!(next_json(&mut client).await["message"], "no db today");
    let metrics = app.engine.metrics.snapshot();
    assert_eq!(metrics.persist_failures, 1);
    assert_eq!(metrics.history_failures, 1);
}

#[tokio::test]
async fn test_idle_connection_is_closed() {
    let app = TestApp::spawn_with(Arc::new(MemoryMessageStore::new()), |config| {
        config.realtime.idle_timeout_seconds = 1;
    })
    .await;
    let mut client = app.ws_registered().await;

    expect_closed(&mut client).await;
    app.wait_for_connections(0).await;
}

#[tokio::test]
async fn test_engine_shutdown_closes_clients() {
    let app = TestApp::spawn().await;
    let mut a = app.ws_registered().await;
    let mut b = app.ws_registered().await;

    app.engine.shutdown().await.unwrap();

    expect_closed(&mut a).await;
    expect_closed(&mut b).await;
    assert!(app.engine.registry.is_empty().await);
}

#[tokio::test]
async fn test_client_after_shutdown_is_turned_away() {
    let app = TestApp::spawn().await;
    app.engine.shutdown().await.unwrap();

    let mut late = app.ws().await;

    expect_closed(&mut late).await;
    assert!(app.engine.registry.is_empty().await);
    assert_eq!(app.engine.metrics.snapshot().connections_opened, 0);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::spawn().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_chat_history_endpoint_matches_replay() {
    let store = Arc::new(MemoryMessageStore::new());
    let app = TestApp::spawn_with(store.clone(), |_| {}).await;
    let mut client = app.ws_registered().await;

    send_chat(&mut client, "alice", "first").await;
    send_chat(&mut client, "bob", "second").await;
    wait_for_stored(&store, 2).await;

    let response = app.request("GET", "/api/chat-history", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let messages: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[tokio::test]
async fn test_invalid_wallet_json_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .request(
            "POST",
            "/wallets",
            Some(serde_json::json!({ "username": "alice" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}
