//! Wallet CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, warn};

use wallethub_core::error::AppError;
use wallethub_entity::wallet::Wallet;
use wallethub_realtime::message::WALLET_CREATED_NOTICE;

use crate::dto::request::{CreateWalletRequest, UpdateWalletRequest};
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /wallets
pub async fn create_wallet(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Wallet>), ApiError> {
    let wallet = state
        .wallet_repo
        .create(&req.username, &req.address, req.balance, &req.currency)
        .await?;

    info!(wallet_id = wallet.id, username = %wallet.username, "Wallet created");

    if state.config.realtime.notify_on_wallet_create {
        if let Err(e) = state.realtime.router.notify(WALLET_CREATED_NOTICE).await {
            warn!(error = %e, "Failed to broadcast wallet notice");
        }
    }

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// GET /wallets
pub async fn list_wallets(State(state): State<AppState>) -> Result<Json<Vec<Wallet>>, ApiError> {
    Ok(Json(state.wallet_repo.find_all().await?))
}

/// GET /wallets/username/{username}
pub async fn list_wallets_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Wallet>>, ApiError> {
    Ok(Json(state.wallet_repo.find_by_username(&username).await?))
}

/// PUT /wallets/{id}
pub async fn update_wallet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateWalletRequest>,
) -> Result<Json<Wallet>, ApiError> {
    let id = parse_id(&id)?;
    let wallet = state
        .wallet_repo
        .update(id, &req.address, req.balance, &req.currency)
        .await?
        .ok_or_else(|| AppError::not_found("Wallet not found"))?;

    info!(wallet_id = id, "Wallet updated");
    Ok(Json(wallet))
}

/// DELETE /wallets/{id}
pub async fn delete_wallet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.wallet_repo.delete(id).await? {
        return Err(AppError::not_found("Wallet not found").into());
    }

    info!(wallet_id = id, "Wallet deleted");
    Ok(StatusCode::NO_CONTENT)
}
