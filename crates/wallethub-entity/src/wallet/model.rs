//! Wallet entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A crypto wallet record owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wallet {
    /// Server-assigned identifier.
    pub id: i64,
    /// Owning username.
    pub username: String,
    /// On-chain address.
    pub address: String,
    /// Current balance.
    pub balance: f64,
    /// Currency ticker (e.g. `BTC`).
    pub currency: String,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// When the wallet was last updated.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}
