//! Bill category metadata

use axum::Json;

use billbook_core::models::{Category, CategorySpec};

/// GET /api/categories - Labels, units and rate divisors
pub async fn list_categories() -> Json<Vec<CategorySpec>> {
    Json(Category::specs().to_vec())
}
