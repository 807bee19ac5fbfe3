//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use sqlx::PgPool;

use wallethub_core::config::AppConfig;
use wallethub_database::repositories::{AnnouncementRepository, WalletRepository};
use wallethub_realtime::server::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// Realtime engine; also serves chat history
    pub realtime: Arc<RealtimeEngine>,
    /// Wallet repository
    pub wallet_repo: Arc<WalletRepository>,
    /// Announcement repository
    pub announcement_repo: Arc<AnnouncementRepository>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Build the state and its repositories over one pool.
    pub fn new(config: AppConfig, db_pool: PgPool, realtime: Arc<RealtimeEngine>) -> Self {
        Self {
            config: Arc::new(config),
            wallet_repo: Arc::new(WalletRepository::new(db_pool.clone())),
            announcement_repo: Arc::new(AnnouncementRepository::new(db_pool.clone())),
            db_pool,
            realtime,
            started_at: Instant::now(),
        }
    }
}
