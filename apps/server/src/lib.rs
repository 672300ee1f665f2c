//! # Shopbook Server Library
//!
//! REST transport over the shopbook-db operation surface.
//!
//! ## Module Organization
//! ```text
//! shopbook_server/
//! ├── lib.rs          ◄─── router assembly (this file)
//! ├── config.rs       ◄─── env-based server configuration
//! ├── error.rs        ◄─── ApiError with HTTP status mapping
//! └── routes/
//!     ├── sales.rs    ◄─── sale list/create/delete
//!     ├── expenses.rs ◄─── expense list/create/delete
//!     ├── inventory.rs◄─── item CRUD + stock adjustment
//!     ├── settings.rs ◄─── settings get/set
//!     ├── dashboard.rs◄─── monthly totals
//!     └── transfer.rs ◄─── CSV/JSON export & import
//! ```
//!
//! The router is a plain function over a [`Database`], so tests drive it
//! in-process with `tower::ServiceExt::oneshot` against an in-memory store.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::Extension;
use axum::Router;

use shopbook_db::Database;

/// Shared handler context.
#[derive(Clone)]
pub struct AppContext {
    pub db: Database,
}

/// Builds the full application router over the given database.
pub fn router(db: Database) -> Router {
    let ctx = Arc::new(AppContext { db });

    Router::new()
        .nest("/api", routes::api_router())
        .layer(Extension(ctx))
}
