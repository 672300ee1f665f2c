//! # Route Modules
//!
//! One module per resource; each contributes a sub-router that
//! [`api_router`] merges under the `/api` prefix.

pub mod dashboard;
pub mod expenses;
pub mod inventory;
pub mod sales;
pub mod settings;
pub mod transfer;

use axum::routing::get;
use axum::{Json, Router};

/// Assembles all resource routers plus the health probe.
pub fn api_router() -> Router {
    Router::new()
        .merge(sales::router())
        .merge(expenses::router())
        .merge(inventory::router())
        .merge(settings::router())
        .merge(dashboard::router())
        .merge(transfer::router())
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
