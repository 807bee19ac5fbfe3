//! Convenience result type alias for WalletHub.

use crate::error::AppError;

/// A specialized `Result` type for WalletHub operations.
pub type AppResult<T> = Result<T, AppError>;
