//! # Dashboard Route
//!
//! `GET /api/dashboard/:year/:month` - monthly sales, expenses, net profit,
//! and bank balance, all in cents.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::AppContext;
use shopbook_core::MonthlyDashboard;

pub fn router() -> Router {
    Router::new().route("/dashboard/:year/:month", get(monthly_dashboard))
}

pub async fn monthly_dashboard(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthlyDashboard>, ApiError> {
    let dashboard = ctx.db.dashboard().monthly_totals(year, month).await?;
    Ok(Json(dashboard))
}
