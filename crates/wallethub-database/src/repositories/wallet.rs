//! Wallet repository implementation.

use sqlx::PgPool;

use wallethub_core::error::{AppError, ErrorKind};
use wallethub_core::result::AppResult;
use wallethub_entity::wallet::Wallet;

/// Repository for wallet CRUD operations. Deletion is soft: rows keep a
/// `deleted_at` stamp and disappear from every read.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    /// Create a new wallet repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a wallet and return the stored row.
    pub async fn create(
        &self,
        username: &str,
        address: &str,
        balance: f64,
        currency: &str,
    ) -> AppResult<Wallet> {
        sqlx::query_as::<_, Wallet>(
            "INSERT INTO wallets (username, address, balance, currency) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(username)
        .bind(address)
        .bind(balance)
        .bind(currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create wallet", e))
    }

    /// List every live wallet.
    pub async fn find_all(&self) -> AppResult<Vec<Wallet>> {
        sqlx::query_as::<_, Wallet>(
            "SELECT * FROM wallets WHERE deleted_at IS NULL ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list wallets", e))
    }

    /// List the live wallets belonging to a username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Vec<Wallet>> {
        sqlx::query_as::<_, Wallet>(
            "SELECT * FROM wallets WHERE username = $1 AND deleted_at IS NULL ORDER BY id ASC",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list wallets by username", e)
        })
    }

    /// Replace the mutable fields of a wallet. Returns `None` when no live
    /// wallet has that id.
    pub async fn update(
        &self,
        id: i64,
        address: &str,
        balance: f64,
        currency: &str,
    ) -> AppResult<Option<Wallet>> {
        sqlx::query_as::<_, Wallet>(
            "UPDATE wallets SET address = $2, balance = $3, currency = $4, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(address)
        .bind(balance)
        .bind(currency)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update wallet", e))
    }

    /// Soft-delete a wallet. Returns `true` if a live row was deleted.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE wallets SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete wallet", e))?;
        Ok(result.rows_affected() > 0)
    }
}
