//! # Repository Modules
//!
//! One repository per collection, each a thin struct over the shared
//! `SqlitePool`:
//!
//! - [`sale`] - sale queries (read-only: sale writes belong to the lifecycle)
//! - [`expense`] - expense CRUD
//! - [`inventory`] - inventory item CRUD (stock arithmetic lives in the ledger)
//! - [`settings`] - key-value settings, bank balance helpers
//!
//! Repositories are cheap to construct (they clone the pool handle), so the
//! [`crate::Database`] accessors create them on demand.

pub mod expense;
pub mod inventory;
pub mod sale;
pub mod settings;

pub use expense::{ExpenseFilter, ExpenseRepository};
pub use inventory::{InventoryFilter, InventoryRepository};
pub use sale::{SaleFilter, SaleRepository};
pub use settings::SettingsRepository;
