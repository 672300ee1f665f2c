//! # shopbook-db: Database Layer for Shopbook
//!
//! SQLite storage and the transactional services built on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Shopbook Data Flow                            │
//! │                                                                     │
//! │  apps/server handler (create sale, adjust stock, ...)               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  shopbook-db (THIS CRATE)                     │  │
//! │  │                                                               │  │
//! │  │  Database (pool.rs)   Repositories        Services            │  │
//! │  │  SqlitePool, WAL      sale (read-only)    ledger              │  │
//! │  │  embedded             expense             lifecycle           │  │
//! │  │  migrations           inventory           dashboard           │  │
//! │  │                       settings            transfer            │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - connection pool creation and the [`Database`] handle
//! - [`migrations`] - embedded database migrations
//! - [`error`] - [`DbError`] (storage) and [`ServiceError`] (storage ∪ domain)
//! - [`repository`] - per-collection repositories
//! - [`ledger`] - stock reserve/release/adjust with the stock invariants
//! - [`lifecycle`] - transactional sale create/delete
//! - [`dashboard`] - monthly totals
//! - [`transfer`] - CSV export/import, JSON backup/restore
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/shopbook.db")).await?;
//! let outcome = db.sale_lifecycle().create_sale(input).await?;
//! ```

pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transfer;

pub use dashboard::DashboardAggregator;
pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use ledger::InventoryLedger;
pub use lifecycle::SaleLifecycle;
pub use pool::{Database, DbConfig};
pub use repository::{
    ExpenseFilter, ExpenseRepository, InventoryFilter, InventoryRepository, SaleFilter,
    SaleRepository, SettingsRepository,
};
pub use transfer::{BackupPayload, TransferService};
