//! Route definitions for the WalletHub HTTP API.
//!
//! Wallet and announcement paths sit at the root, health and chat history
//! under `/api`, and the realtime gateway at `/ws`.

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route, threading `AppState` through
/// `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .route("/chat-history", get(handlers::chat::chat_history));

    Router::new()
        .merge(wallet_routes())
        .merge(announcement_routes())
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Wallet CRUD
fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/wallets",
            get(handlers::wallet::list_wallets).post(handlers::wallet::create_wallet),
        )
        .route(
            "/wallets/username/{username}",
            get(handlers::wallet::list_wallets_by_username),
        )
        .route(
            "/wallets/{id}",
            axum::routing::put(handlers::wallet::update_wallet)
                .delete(handlers::wallet::delete_wallet),
        )
}

fn announcement_routes() -> Router<AppState> {
    Router::new().route(
        "/announcements",
        get(handlers::announcement::list_announcements)
            .post(handlers::announcement::create_announcement),
    )
}

/// Liveness and dependency checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
