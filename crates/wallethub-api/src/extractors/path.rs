//! Typed path parameter helpers.

use wallethub_core::error::AppError;

/// Parses a numeric record id from a path segment.
pub fn parse_id(s: &str) -> Result<i64, AppError> {
    s.trim()
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid id: {s}")))
}
