//! # Inventory Routes
//!
//! `GET/POST /api/inventory`, `PUT/DELETE /api/inventory/:id`, and the
//! standalone ledger entry point `PUT /api/inventory/:id/stock`.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppContext;
use shopbook_core::validation::validate_new_inventory_item;
use shopbook_core::{InventoryItem, NewInventoryItem, StockAdjustment, StockOperation};
use shopbook_db::InventoryFilter;

pub fn router() -> Router {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route(
            "/inventory/:id",
            put(update_item).delete(delete_item),
        )
        .route("/inventory/:id/stock", put(adjust_stock))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub quantity: i64,
    /// Defaults to subtract, matching the original stock endpoint.
    #[serde(default = "default_operation")]
    pub operation: StockOperation,
}

fn default_operation() -> StockOperation {
    StockOperation::Subtract
}

pub async fn list_items(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let filter = InventoryFilter {
        category: query.category,
        search: query.search,
    };
    let items = ctx.db.inventory().list(&filter).await?;
    Ok(Json(items))
}

pub async fn create_item(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(input): Json<NewInventoryItem>,
) -> Result<Json<InventoryItem>, ApiError> {
    debug!(name = %input.name, "create_item request");

    validate_new_inventory_item(&input)?;
    let item = ctx.db.inventory().create(&input).await?;
    Ok(Json(item))
}

pub async fn update_item(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(input): Json<NewInventoryItem>,
) -> Result<Json<InventoryItem>, ApiError> {
    debug!(id = %id, "update_item request");

    validate_new_inventory_item(&input)?;
    let item = ctx.db.inventory().update(&id, &input).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(id = %id, "delete_item request");

    ctx.db.inventory().delete(&id).await?;
    Ok(Json(serde_json::json!({
        "message": "Inventory item deleted successfully"
    })))
}

pub async fn adjust_stock(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(request): Json<AdjustStockRequest>,
) -> Result<Json<StockAdjustment>, ApiError> {
    debug!(id = %id, quantity = request.quantity, operation = ?request.operation, "adjust_stock request");

    let adjustment = ctx
        .db
        .ledger()
        .adjust(&id, request.quantity, request.operation)
        .await?;
    Ok(Json(adjustment))
}
