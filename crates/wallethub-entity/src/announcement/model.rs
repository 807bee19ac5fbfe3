//! Announcement entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A public announcement shown on the feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    /// Server-assigned identifier.
    pub id: i64,
    /// Announcement title.
    pub title: String,
    /// Announcement body.
    pub content: String,
    /// When the announcement was created.
    pub created_at: DateTime<Utc>,
    /// When the announcement was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}
