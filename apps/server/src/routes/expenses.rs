//! # Expense Routes
//!
//! `GET /api/expenses`, `POST /api/expenses`, `DELETE /api/expenses/:id`.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppContext;
use shopbook_core::validation::validate_new_expense;
use shopbook_core::{Expense, NewExpense};
use shopbook_db::ExpenseFilter;

pub fn router() -> Router {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", axum::routing::delete(delete_expense))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensesQuery {
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
}

pub async fn list_expenses(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let filter = ExpenseFilter {
        category: query.category,
        date: query.date,
        search: query.search,
    };
    let expenses = ctx.db.expenses().list(&filter).await?;
    Ok(Json(expenses))
}

pub async fn create_expense(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(input): Json<NewExpense>,
) -> Result<Json<Expense>, ApiError> {
    debug!(category = %input.category, "create_expense request");

    validate_new_expense(&input)?;
    let expense = ctx.db.expenses().create(&input).await?;
    Ok(Json(expense))
}

pub async fn delete_expense(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(id = %id, "delete_expense request");

    ctx.db.expenses().delete(&id).await?;
    Ok(Json(serde_json::json!({
        "message": "Expense deleted successfully"
    })))
}
