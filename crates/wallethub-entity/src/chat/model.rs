//! Chat message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A chat message persisted by the realtime engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Server-assigned identifier.
    pub id: i64,
    /// Sender display name.
    pub username: String,
    /// Message text.
    pub message: String,
    /// Server-assigned send time; history is ordered by this column.
    pub timestamp: DateTime<Utc>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
}
