//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod bills;
pub mod categories;
pub mod charts;
pub mod dashboard;
pub mod export;

// Re-export all handlers for use in router
pub use auth::*;
pub use bills::*;
pub use categories::*;
pub use charts::*;
pub use dashboard::*;
pub use export::*;

use billbook_core::models::{Category, User};
use serde::de::DeserializeOwned;

use crate::{AppError, AppState};

/// Look up the user named in the path, or 404
pub(crate) fn require_user(state: &AppState, user_id: i64) -> Result<User, AppError> {
    state
        .db
        .get_user(user_id)?
        .ok_or_else(|| AppError::not_found(&format!("User {} not found", user_id)))
}

/// Parse a bill category path segment
pub(crate) fn parse_category(value: &str) -> Result<Category, AppError> {
    Ok(value.parse::<Category>()?)
}

/// Decode a JSON request body with a uniform error response
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}
