//! Announcement handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use wallethub_entity::announcement::Announcement;

use crate::dto::request::CreateAnnouncementRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>), ApiError> {
    let announcement = state
        .announcement_repo
        .create(&req.title, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// GET /announcements
///
/// An empty table answers 404 with `{"message": "No announcements found."}`.
pub async fn list_announcements(State(state): State<AppState>) -> Result<Response, ApiError> {
    let announcements = state.announcement_repo.find_all().await?;

    if announcements.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new("No announcements found.")),
        )
            .into_response());
    }

    Ok(Json(announcements).into_response())
}
