//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use billbook_core::models::{BillSort, Dashboard, SortField, SortOrder, YearFilter};

/// Query parameters for the dashboard
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// `all_time` (default) or a year
    pub year: Option<String>,
    /// date | usage | rate | amount
    pub sort: Option<String>,
    /// asc | desc
    pub order: Option<String>,
}

impl DashboardQuery {
    fn year_filter(&self) -> Result<YearFilter, AppError> {
        Ok(self.year.as_deref().unwrap_or_default().parse()?)
    }

    fn bill_sort(&self) -> Result<BillSort, AppError> {
        let field = match self.sort.as_deref() {
            Some(s) if !s.is_empty() => s.parse::<SortField>()?,
            _ => SortField::default(),
        };
        let order = match self.order.as_deref() {
            Some(s) if !s.is_empty() => s.parse::<SortOrder>()?,
            _ => SortOrder::default(),
        };
        Ok(BillSort::new(field, order))
    }
}

/// GET /api/users/:user_id/dashboard - Bills, averages and years per category
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let year = query.year_filter()?;
    let sort = query.bill_sort()?;

    Ok(Json(state.db.dashboard(user_id, year, sort)?))
}
