//! # Inventory Ledger
//!
//! Owns the two stock invariants for inventory items:
//!
//! 1. `current_stock >= 0` - a reservation that would drive stock negative
//!    fails with `InsufficientStock` and mutates nothing
//! 2. `total_value_cents == current_stock * unit_cost_cents` after every
//!    committed mutation
//!
//! ## Two Entry Levels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  InventoryLedger::reserve / release / adjust                        │
//! │    Standalone entry points; each runs in its own transaction.       │
//! │    `adjust` is the manual stock-correction operation                │
//! │    (operation: add | subtract).                                     │
//! │                                                                     │
//! │  reserve_on / release_on (crate-private)                            │
//! │    Connection-scoped variants the sale lifecycle composes into ITS  │
//! │    transaction, so a sale insert and its reservation commit or      │
//! │    roll back together.                                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no deduplication key: calling release twice for the same sale
//! would double-restore. The lifecycle guarantees one call per event.

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, ServiceResult};
use shopbook_core::validation::validate_quantity;
use shopbook_core::{CoreError, StockAdjustment, StockOperation};

/// Stock fields read before a mutation. The name rides along so error
/// messages can show it without a second lookup.
#[derive(Debug, FromRow)]
struct StockSnapshot {
    name: String,
    current_stock: i64,
    unit_cost_cents: i64,
}

/// The inventory ledger service.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
}

impl InventoryLedger {
    /// Creates a new InventoryLedger.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryLedger { pool }
    }

    /// Reserves `quantity` units: decrements stock, failing if the item is
    /// missing or stock would go negative. Returns the new stock level.
    pub async fn reserve(&self, item_id: &str, quantity: i64) -> ServiceResult<i64> {
        validate_quantity("quantity", quantity)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let new_stock = reserve_on(&mut tx, item_id, quantity).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(new_stock)
    }

    /// Releases `quantity` units back: increments stock, failing if the item
    /// is missing. Returns the new stock level.
    pub async fn release(&self, item_id: &str, quantity: i64) -> ServiceResult<i64> {
        validate_quantity("quantity", quantity)?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        let new_stock = release_on(&mut tx, item_id, quantity).await?;
        tx.commit().await.map_err(DbError::from)?;

        Ok(new_stock)
    }

    /// Manual stock adjustment, independent of any sale.
    pub async fn adjust(
        &self,
        item_id: &str,
        quantity: i64,
        operation: StockOperation,
    ) -> ServiceResult<StockAdjustment> {
        let new_stock = match operation {
            StockOperation::Subtract => self.reserve(item_id, quantity).await?,
            StockOperation::Add => self.release(item_id, quantity).await?,
        };

        debug!(item_id = %item_id, ?operation, quantity, new_stock, "Stock adjusted");

        Ok(StockAdjustment {
            new_stock,
            operation,
            quantity,
        })
    }
}

/// Connection-scoped reserve. Callers own the surrounding transaction.
pub(crate) async fn reserve_on(
    conn: &mut SqliteConnection,
    item_id: &str,
    quantity: i64,
) -> ServiceResult<i64> {
    let snapshot = read_snapshot(conn, item_id).await?;

    let new_stock = snapshot.current_stock - quantity;
    if new_stock < 0 {
        return Err(CoreError::InsufficientStock {
            name: snapshot.name,
            available: snapshot.current_stock,
            requested: quantity,
        }
        .into());
    }

    write_stock(conn, item_id, new_stock, snapshot.unit_cost_cents).await?;
    Ok(new_stock)
}

/// Connection-scoped release. Callers own the surrounding transaction.
pub(crate) async fn release_on(
    conn: &mut SqliteConnection,
    item_id: &str,
    quantity: i64,
) -> ServiceResult<i64> {
    let snapshot = read_snapshot(conn, item_id).await?;

    let new_stock = snapshot
        .current_stock
        .checked_add(quantity)
        .ok_or_else(|| DbError::Internal("stock level overflows i64".to_string()))?;

    write_stock(conn, item_id, new_stock, snapshot.unit_cost_cents).await?;
    Ok(new_stock)
}

async fn read_snapshot(conn: &mut SqliteConnection, item_id: &str) -> ServiceResult<StockSnapshot> {
    let snapshot = sqlx::query_as::<_, StockSnapshot>(
        "SELECT name, current_stock, unit_cost_cents FROM inventory_items WHERE id = ?1",
    )
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(DbError::from)?
    .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

    Ok(snapshot)
}

async fn write_stock(
    conn: &mut SqliteConnection,
    item_id: &str,
    new_stock: i64,
    unit_cost_cents: i64,
) -> ServiceResult<()> {
    let total_value_cents = new_stock
        .checked_mul(unit_cost_cents)
        .ok_or_else(|| DbError::Internal("stock value overflows i64".to_string()))?;
    let now = chrono::Utc::now();

    sqlx::query(
        "UPDATE inventory_items SET current_stock = ?1, total_value_cents = ?2, \
         updated_at = ?3 WHERE id = ?4",
    )
    .bind(new_stock)
    .bind(total_value_cents)
    .bind(now)
    .bind(item_id)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
