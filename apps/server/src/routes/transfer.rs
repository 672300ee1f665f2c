//! # Transfer Routes
//!
//! CSV export/import per collection and JSON backup/restore:
//!
//! - `GET  /api/export/:kind` (sales | expenses | inventory) → text/csv
//! - `GET  /api/export/backup` → JSON backup payload
//! - `POST /api/import/:kind` (CSV request body) → imported row count
//! - `POST /api/import/backup` (JSON backup payload) → replaces the store

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::debug;

use crate::error::ApiError;
use crate::AppContext;
use shopbook_db::BackupPayload;

pub fn router() -> Router {
    Router::new()
        .route("/export/backup", get(export_backup))
        .route("/export/:kind", get(export_csv))
        .route("/import/backup", post(import_backup))
        .route("/import/:kind", post(import_csv))
}

/// The three CSV-transferable collections.
enum CsvKind {
    Sales,
    Expenses,
    Inventory,
}

impl CsvKind {
    fn parse(kind: &str) -> Result<Self, ApiError> {
        match kind {
            "sales" => Ok(CsvKind::Sales),
            "expenses" => Ok(CsvKind::Expenses),
            "inventory" => Ok(CsvKind::Inventory),
            other => Err(ApiError::validation(format!(
                "unknown export kind '{other}': expected sales, expenses, or inventory"
            ))),
        }
    }
}

pub async fn export_csv(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(kind = %kind, "export_csv request");

    let transfer = ctx.db.transfer();
    let csv_text = match CsvKind::parse(&kind)? {
        CsvKind::Sales => transfer.export_sales_csv().await?,
        CsvKind::Expenses => transfer.export_expenses_csv().await?,
        CsvKind::Inventory => transfer.export_inventory_csv().await?,
    };

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv_text,
    ))
}

pub async fn import_csv(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(kind): Path<String>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(kind = %kind, bytes = body.len(), "import_csv request");

    let transfer = ctx.db.transfer();
    let imported = match CsvKind::parse(&kind)? {
        CsvKind::Sales => transfer.import_sales_csv(&body).await?,
        CsvKind::Expenses => transfer.import_expenses_csv(&body).await?,
        CsvKind::Inventory => transfer.import_inventory_csv(&body).await?,
    };

    Ok(Json(serde_json::json!({ "imported": imported })))
}

pub async fn export_backup(
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Result<Json<BackupPayload>, ApiError> {
    let backup = ctx.db.transfer().export_backup().await?;
    Ok(Json(backup))
}

pub async fn import_backup(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(backup): Json<BackupPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(
        sales = backup.sales.len(),
        expenses = backup.expenses.len(),
        inventory = backup.inventory.len(),
        "import_backup request"
    );

    ctx.db.transfer().import_backup(&backup).await?;
    Ok(Json(serde_json::json!({
        "message": "Backup restored successfully"
    })))
}
