//! Database-backed integration tests for the wallet, announcement and chat
//! history routes.
//!
//! These need a PostgreSQL server: set `DATABASE_URL` to run them. Each test
//! works in its own schema.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use wallethub_database::repositories::ChatMessageRepository;

use helpers::{TestApp, next_json, next_text, send_chat};

fn wallet_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh",
        "balance": 0.5,
        "currency": "BTC"
    })
}

#[tokio::test]
async fn test_create_wallet_returns_201_and_notifies_clients() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let mut a = app.ws_registered().await;
    let mut b = app.ws_registered().await;

    let response = app.request("POST", "/wallets", Some(wallet_body("alice"))).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], "alice");
    assert_eq!(response.body["currency"], "BTC");
    assert!(response.body["id"].as_i64().is_some());
    assert_eq!(next_text(&mut a).await, "New wallet created!");
    assert_eq!(next_text(&mut b).await, "New wallet created!");

    app.cleanup().await;
}

#[tokio::test]
async fn test_update_and_delete_missing_wallet_return_404() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };

    let update = app
        .request(
            "PUT",
            "/wallets/999999",
            Some(json!({ "address": "0xabc", "balance": 1.0, "currency": "ETH" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let delete = app.request("DELETE", "/wallets/999999", None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    app.cleanup().await;
}

#[tokio::test]
async fn test_update_replaces_wallet_fields() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let created = app.request("POST", "/wallets", Some(wallet_body("bob"))).await;
    let id = created.body["id"].as_i64().unwrap();

    let updated = app
        .request(
            "PUT",
            &format!("/wallets/{id}"),
            Some(json!({ "address": "0xdef", "balance": 2.0, "currency": "ETH" })),
        )
        .await;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["id"], id);
    assert_eq!(updated.body["username"], "bob");
    assert_eq!(updated.body["address"], "0xdef");
    assert_eq!(updated.body["balance"], 2.0);
    assert_eq!(updated.body["currency"], "ETH");

    app.cleanup().await;
}

#[tokio::test]
async fn test_soft_deleted_wallet_disappears_from_reads() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let keep = app.request("POST", "/wallets", Some(wallet_body("carol"))).await;
    let gone = app.request("POST", "/wallets", Some(wallet_body("carol"))).await;
    let keep_id = keep.body["id"].as_i64().unwrap();
    let gone_id = gone.body["id"].as_i64().unwrap();

    let delete = app
        .request("DELETE", &format!("/wallets/{gone_id}"), None)
        .await;
    assert_eq!(delete.status, StatusCode::NO_CONTENT);

    let all = app.request("GET", "/wallets", None).await;
    let ids: Vec<i64> = all
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![keep_id]);

    let by_name = app.request("GET", "/wallets/username/carol", None).await;
    assert_eq!(by_name.status, StatusCode::OK);
    assert_eq!(by_name.body.as_array().unwrap().len(), 1);
    assert_eq!(by_name.body[0]["id"], keep_id);

    let again = app
        .request("DELETE", &format!("/wallets/{gone_id}"), None)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let row: (Option<chrono::DateTime<Utc>>,) =
        sqlx::query_as("SELECT deleted_at FROM wallets WHERE id = $1")
            .bind(gone_id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert!(row.0.is_some());

    app.cleanup().await;
}

#[tokio::test]
async fn test_announcements_empty_then_created() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };

    let empty = app.request("GET", "/announcements", None).await;
    assert_eq!(empty.status, StatusCode::NOT_FOUND);
    assert_eq!(empty.body, json!({ "message": "No announcements found." }));

    let created = app
        .request(
            "POST",
            "/announcements",
            Some(json!({ "title": "Maintenance", "content": "Sunday 02:00 UTC" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Maintenance");

    let listed = app.request("GET", "/announcements", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let titles: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Maintenance"]);

    app.cleanup().await;
}

#[tokio::test]
async fn test_find_recent_returns_newest_ascending() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let repo = ChatMessageRepository::new(app.db_pool.clone());
    let base = Utc::now() - Duration::minutes(10);

    // Inserted out of send order on purpose.
    for i in [3, 1, 5, 2, 4] {
        repo.create("seed", &format!("m{i}"), base + Duration::seconds(i))
            .await
            .unwrap();
    }

    let recent: Vec<String> = repo
        .find_recent(3)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.message)
        .collect();
    assert_eq!(recent, vec!["m3", "m4", "m5"]);

    assert!(repo.find_recent(0).await.unwrap().is_empty());
    assert_eq!(repo.find_recent(50).await.unwrap().len(), 5);

    app.cleanup().await;
}

#[tokio::test]
async fn test_chat_is_stored_and_served_as_history() {
    let Some(app) = TestApp::with_database().await else {
        return;
    };
    let mut client = app.ws_registered().await;

    send_chat(&mut client, "alice", "persisted").await;
    let echoed = next_json(&mut client).await;
    assert_eq!(echoed["message"], "persisted");

    let history = app.request("GET", "/api/chat-history", None).await;
    assert_eq!(history.status, StatusCode::OK);
    let messages = history.body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["username"], "alice");
    assert_eq!(messages[0]["message"], "persisted");

    app.cleanup().await;
}
