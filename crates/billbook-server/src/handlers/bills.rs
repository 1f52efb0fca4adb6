//! Bill CRUD and filter handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{parse_category, parse_json, require_user};
use crate::{AppError, AppState};
use billbook_core::filter::{BillFilter, FilterParams};
use billbook_core::models::{Bill, BillInput, FilteredBills};

/// A form field that may arrive as a JSON string or number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => s,
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

/// Request body for creating or editing a bill
#[derive(Debug, Deserialize)]
pub struct BillRequest {
    pub usage: FieldValue,
    pub rate: FieldValue,
    /// Billing month, `YYYY-MM`
    pub date: String,
}

impl From<BillRequest> for BillInput {
    fn from(req: BillRequest) -> Self {
        BillInput::new(req.usage, req.rate, req.date)
    }
}

/// GET /api/users/:user_id/bills/:category - List bills in storage order
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
    Path((user_id, category)): Path<(i64, String)>,
) -> Result<Json<Vec<Bill>>, AppError> {
    let category = parse_category(&category)?;
    require_user(&state, user_id)?;

    Ok(Json(state.db.list_bills(user_id, category)?))
}

/// POST /api/users/:user_id/bills/:category - Add a bill
pub async fn create_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, category)): Path<(i64, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    let category = parse_category(&category)?;
    let req: BillRequest = parse_json(&body)?;

    let bill = state.db.add_bill(user_id, category, &req.into())?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// GET /api/users/:user_id/bills/:category/:id - Get one bill
pub async fn get_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, category, id)): Path<(i64, String, i64)>,
) -> Result<Json<Bill>, AppError> {
    let category = parse_category(&category)?;
    Ok(Json(state.db.get_user_bill(user_id, category, id)?))
}

/// PUT /api/users/:user_id/bills/:category/:id - Edit a bill
pub async fn update_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, category, id)): Path<(i64, String, i64)>,
    body: Bytes,
) -> Result<Json<Bill>, AppError> {
    let category = parse_category(&category)?;
    let req: BillRequest = parse_json(&body)?;

    Ok(Json(state.db.edit_bill(user_id, category, id, &req.into())?))
}

/// DELETE /api/users/:user_id/bills/:category/:id - Delete a bill
pub async fn delete_bill(
    State(state): State<Arc<AppState>>,
    Path((user_id, category, id)): Path<(i64, String, i64)>,
) -> Result<StatusCode, AppError> {
    let category = parse_category(&category)?;
    state.db.delete_user_bill(user_id, category, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/:user_id/bills/:category/filter - Range-filtered bills
pub async fn filter_bills(
    State(state): State<Arc<AppState>>,
    Path((user_id, category)): Path<(i64, String)>,
    Query(params): Query<FilterParams>,
) -> Result<Json<FilteredBills>, AppError> {
    let category = parse_category(&category)?;
    let filter = BillFilter::from_params(&params)?;

    Ok(Json(state.db.filter_bills(user_id, category, &filter)?))
}
