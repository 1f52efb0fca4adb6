//! Chart handlers: JSON series and the rendered PNG

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::{parse_category, require_user};
use crate::{AppError, AppState};
use billbook_core::chart::{build_chart, ChartData};
use billbook_core::models::{Bill, YearFilter};
use billbook_core::plot::{render_png, DEFAULT_CHART_SIZE, PNG_CONTENT_TYPE};

#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// `all_time` (default) or a year
    pub time_range: Option<String>,
}

fn load_chart(
    state: &AppState,
    user_id: i64,
    category: &str,
    query: &ChartQuery,
) -> Result<ChartData, AppError> {
    let category = parse_category(category)?;
    let range: YearFilter = query.time_range.as_deref().unwrap_or_default().parse()?;
    require_user(state, user_id)?;

    let bills: Vec<Bill> = state
        .db
        .list_bills(user_id, category)?
        .into_iter()
        .filter(|b| range.matches(b.date))
        .collect();

    let chart = build_chart(category, &bills);
    debug!(user_id, category = %category, months = chart.months.len(), "Built chart");
    Ok(chart)
}

/// GET /api/users/:user_id/chart/:category - Monthly rate/usage/amount series with trends
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path((user_id, category)): Path<(i64, String)>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartData>, AppError> {
    Ok(Json(load_chart(&state, user_id, &category, &query)?))
}

/// GET /api/users/:user_id/chart/:category/png - The same chart rendered as a PNG
pub async fn get_chart_png(
    State(state): State<Arc<AppState>>,
    Path((user_id, category)): Path<(i64, String)>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, AppError> {
    let chart = load_chart(&state, user_id, &category, &query)?;
    let png = render_png(&chart, DEFAULT_CHART_SIZE)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PNG_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(png))
        .map_err(|e| AppError::internal(&e.to_string()))
}
