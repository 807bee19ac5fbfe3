//! Health check handlers.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use wallethub_database::connection::health_check;

use crate::dto::response::{DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let database_ok = match health_check(&state.db_pool).await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    let mode = match state.realtime.config().mode {
        wallethub_core::config::RealtimeMode::Chat => "chat",
        wallethub_core::config::RealtimeMode::Notify => "notify",
    };

    Json(DetailedHealthResponse {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        database: if database_ok {
            "connected"
        } else {
            "unreachable"
        }
        .to_string(),
        realtime_mode: mode.to_string(),
        ws_connections: state.realtime.registry.len().await,
        realtime: state.realtime.metrics.snapshot(),
    })
}
