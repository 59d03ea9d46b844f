use axum::extract::{Path, Query, State};
use axum::Json;
use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::dashboard::{
    calculate_percentage_change, fetch_dashboard_data, DashboardData, DashboardView,
    PercentageChange,
};
use crate::errors::AppError;
use crate::AppState;

/// GET /api/dashboard/:wallet: totals plus the raw position snapshot.
pub async fn summary(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<DashboardData>, AppError> {
    counter!("dashboard_requests_total").increment(1);
    let data =
        fetch_dashboard_data(state.positions.as_ref(), &wallet, state.config.borrow_haircut).await?;
    Ok(Json(data))
}

/// GET /api/dashboard/:wallet/view: display-ready strings.
pub async fn view(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<Json<DashboardView>, AppError> {
    counter!("dashboard_requests_total").increment(1);
    let data =
        fetch_dashboard_data(state.positions.as_ref(), &wallet, state.config.borrow_haircut).await?;
    Ok(Json(DashboardView::from_data(&data, None)))
}

#[derive(Debug, Deserialize)]
pub struct ChangeParams {
    pub current: Decimal,
    pub previous: Decimal,
}

/// GET /api/percentage-change?current=110&previous=100
pub async fn percentage_change(Query(params): Query<ChangeParams>) -> Json<PercentageChange> {
    Json(calculate_percentage_change(params.current, params.previous))
}
