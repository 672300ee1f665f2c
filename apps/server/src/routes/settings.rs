//! # Settings Routes
//!
//! `GET /api/settings/:key`, `POST /api/settings/:key`.
//!
//! A missing key is not an error: it reads as `{ "value": null }`, matching
//! how the dashboard treats an unset bank balance.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use crate::AppContext;
use shopbook_core::validation::validate_name;

pub fn router() -> Router {
    Router::new().route("/settings/:key", get(get_setting).post(set_setting))
}

#[derive(Debug, Deserialize)]
pub struct SetSettingRequest {
    pub value: String,
}

pub async fn get_setting(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let value = ctx.db.settings().get(&key).await?;
    Ok(Json(serde_json::json!({ "value": value })))
}

pub async fn set_setting(
    Extension(ctx): Extension<Arc<AppContext>>,
    Path(key): Path<String>,
    Json(request): Json<SetSettingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(key = %key, "set_setting request");

    validate_name("key", &key)?;
    ctx.db.settings().set(&key, &request.value).await?;
    Ok(Json(serde_json::json!({
        "message": "Setting updated successfully"
    })))
}
