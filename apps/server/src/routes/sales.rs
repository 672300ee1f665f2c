//! # Sale Routes
//!
//! `GET /api/sales`, `POST /api/sales`, `DELETE /api/sales/:id`.
//!
//! Creation and deletion go through the sale lifecycle so inventory-linked
//! sales stay transactional against the ledger; this module only maps HTTP
//! shapes to the typed operations.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppContext;
use shopbook_core::{CreateSaleOutcome, DeleteSaleOutcome, NewSale, Sale};
use shopbook_db::SaleFilter;

/// Default page size when the client paginates without an explicit limit.
const DEFAULT_PAGE_SIZE: u32 = 50;

pub fn router() -> Router {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/:id", axum::routing::delete(delete_sale))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<u32>,
    /// Page size, or the literal string "all" to disable pagination.
    pub limit: Option<String>,
}

impl SalesQuery {
    fn into_filter(self) -> Result<SaleFilter, ApiError> {
        let limit = match self.limit.as_deref() {
            None => Some(DEFAULT_PAGE_SIZE),
            Some("all") => None,
            Some(text) => Some(
                text.parse::<u32>()
                    .map_err(|_| ApiError::validation("limit must be a number or \"all\""))?,
            ),
        };

        Ok(SaleFilter {
            date: self.date,
            search: self.search,
            page: self.page,
            limit,
        })
    }
}

pub async fn list_sales(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<Vec<Sale>>, ApiError> {
    let filter = query.into_filter()?;
    let sales = ctx.db.sales().list(&filter).await?;
    Ok(Json(sales))
}

pub async fn create_sale(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(input): Json<NewSale>,
) -> Result<Json<CreateSaleOutcome>, ApiError> {
    debug!(item = %input.item, quantity = input.quantity, "create_sale request");

    let outcome = ctx.db.sale_lifecycle().create_sale(input).await?;
    Ok(Json(outcome))
}

pub async fn delete_sale(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSaleOutcome>, ApiError> {
    debug!(id = %id, "delete_sale request");

    let outcome = ctx.db.sale_lifecycle().delete_sale(&id).await?;
    Ok(Json(outcome))
}
