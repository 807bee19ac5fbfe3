//! Chat history handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use wallethub_entity::chat::ChatMessage;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/chat-history
///
/// Most recent chat messages, oldest first, capped at the configured
/// history limit.
pub async fn chat_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state.realtime.history().recent().await.map_err(|e| {
        state.realtime.metrics.history_failed();
        warn!(error = %e, "Failed to load chat history");
        e
    })?;
    Ok(Json(messages))
}
