//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create wallet request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWalletRequest {
    /// Owning username.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// On-chain address.
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    /// Opening balance.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Balance cannot be negative"))]
    pub balance: f64,
    /// Currency ticker.
    #[validate(length(min = 1, max = 10, message = "Currency must be 1-10 characters"))]
    pub currency: String,
}

/// Update wallet request body. All three fields are replaced.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWalletRequest {
    /// New address.
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    /// New balance.
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Balance cannot be negative"))]
    pub balance: f64,
    /// New currency ticker.
    #[validate(length(min = 1, max = 10, message = "Currency must be 1-10 characters"))]
    pub currency: String,
}

/// Create announcement request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    /// Headline.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
}
