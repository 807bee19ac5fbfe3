//! Chat message repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use wallethub_core::error::{AppError, ErrorKind};
use wallethub_core::result::AppResult;
use wallethub_entity::chat::ChatMessage;

/// Repository for persisted chat messages.
#[derive(Debug, Clone)]
pub struct ChatMessageRepository {
    pool: PgPool,
}

impl ChatMessageRepository {
    /// Create a new chat message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a message with the given send time.
    pub async fn create(
        &self,
        username: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ChatMessage> {
        sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (username, message, timestamp) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(username)
        .bind(message)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save chat message", e))
    }

    /// Fetch the `limit` most recent messages, returned oldest-first.
    pub async fn find_recent(&self, limit: i64) -> AppResult<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM ( \
                 SELECT * FROM chat_messages ORDER BY timestamp DESC, id DESC LIMIT $1 \
             ) recent ORDER BY timestamp ASC, id ASC",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to retrieve chat history", e)
        })
    }
}
