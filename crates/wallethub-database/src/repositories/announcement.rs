//! Announcement repository implementation.

use sqlx::PgPool;

use wallethub_core::error::{AppError, ErrorKind};
use wallethub_core::result::AppResult;
use wallethub_entity::announcement::Announcement;

/// Repository for the announcement feed.
#[derive(Debug, Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an announcement.
    pub async fn create(&self, title: &str, content: &str) -> AppResult<Announcement> {
        sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (title, content) VALUES ($1, $2) RETURNING *",
        )
        .bind(title)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to save announcement to the database.",
                e,
            )
        })
    }

    /// List live announcements, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<Announcement>> {
        sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements WHERE deleted_at IS NULL ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to retrieve announcements from the database.",
                e,
            )
        })
    }
}
