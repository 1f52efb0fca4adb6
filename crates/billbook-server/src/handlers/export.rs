//! Export handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tracing::info;

use crate::{AppError, AppState};
use billbook_core::export::{ExportFormat, CSV_FILE_NAME};

/// GET /api/users/:user_id/export.csv - Download all of a user's bills
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    let csv = state.db.export_bills(user_id, ExportFormat::Csv)?;
    let rows = csv.lines().count().saturating_sub(1);
    info!(user_id, rows, "Exported bills to CSV");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}
