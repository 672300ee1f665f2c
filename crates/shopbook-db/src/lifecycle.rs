//! # Sale Lifecycle
//!
//! The transactional state machine around sales.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Sale Lifecycle                                  │
//! │                                                                     │
//! │   Proposed ──create_sale──► Committed ──delete_sale──► Deleted      │
//! │                                                                     │
//! │   No other states. Nothing partial is ever visible: each arrow is   │
//! │   exactly one SQLite transaction.                                   │
//! │                                                                     │
//! │   create_sale (inventory-linked):                                   │
//! │     BEGIN → reserve stock → INSERT sale row → COMMIT                │
//! │     Missing item / insufficient stock → ROLLBACK, no sale persisted │
//! │                                                                     │
//! │   delete_sale (inventory-linked):                                   │
//! │     BEGIN → release inventory_quantity → DELETE sale row → COMMIT   │
//! │     Item deleted independently → ROLLBACK, sale row survives        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `delete_sale` is the exact inverse of the linked branch of `create_sale`:
//! composing the two returns `current_stock` and `total_value_cents` to their
//! pre-create values exactly.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, ServiceResult};
use crate::ledger;
use shopbook_core::validation::validate_new_sale;
use shopbook_core::{
    CoreError, CreateSaleOutcome, DeleteSaleOutcome, Money, NewSale, ValidationError,
};

/// Inventory linkage of a stored sale, read inside the delete transaction.
#[derive(Debug, sqlx::FromRow)]
struct SaleLinkage {
    inventory_item_id: Option<String>,
    inventory_quantity: Option<i64>,
}

/// The sale lifecycle service.
#[derive(Debug, Clone)]
pub struct SaleLifecycle {
    pool: SqlitePool,
}

impl SaleLifecycle {
    /// Creates a new SaleLifecycle.
    pub fn new(pool: SqlitePool) -> Self {
        SaleLifecycle { pool }
    }

    /// Creates a sale, reserving inventory when the input links an item.
    ///
    /// The total defaults to `quantity × price` unless the caller supplied an
    /// explicit override. With an inventory link, the reservation and the
    /// sale insert share one transaction; on any failure neither is applied
    /// and the error carries enough context to render a message
    /// (item display name, available and requested quantities).
    pub async fn create_sale(&self, input: NewSale) -> ServiceResult<CreateSaleOutcome> {
        validate_new_sale(&input)?;

        let total_cents = match input.total_cents {
            Some(total) => total,
            None => Money::from_cents(input.price_cents)
                .checked_mul_quantity(input.quantity)
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: "total".to_string(),
                    reason: "quantity × price overflows".to_string(),
                })?
                .cents(),
        };

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, item = %input.item, quantity = input.quantity, "Creating sale");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let new_stock = match input.inventory_item_id.as_deref() {
            Some(item_id) => Some(ledger::reserve_on(&mut tx, item_id, input.quantity).await?),
            None => None,
        };

        sqlx::query(
            "INSERT INTO sales (id, date, item, quantity, price_cents, total_cents, \
             inventory_item_id, inventory_quantity, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&id)
        .bind(input.date)
        .bind(input.item.trim())
        .bind(input.quantity)
        .bind(input.price_cents)
        .bind(total_cents)
        .bind(&input.inventory_item_id)
        // Frozen reservation size: what delete_sale will restore.
        .bind(input.inventory_item_id.as_ref().map(|_| input.quantity))
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        let inventory_updated = new_stock.is_some();
        info!(id = %id, total_cents, inventory_updated, "Sale committed");

        Ok(CreateSaleOutcome {
            id,
            inventory_updated,
            new_stock,
        })
    }

    /// Deletes a sale, releasing its reserved stock when inventory-linked.
    ///
    /// If the linked item was deleted independently, the release fails and
    /// the whole deletion rolls back: the sale row survives rather than
    /// silently disappearing without its stock restore.
    pub async fn delete_sale(&self, id: &str) -> ServiceResult<DeleteSaleOutcome> {
        debug!(id = %id, "Deleting sale");

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let linkage = sqlx::query_as::<_, SaleLinkage>(
            "SELECT inventory_item_id, inventory_quantity FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;

        let outcome = match (linkage.inventory_item_id, linkage.inventory_quantity) {
            (Some(item_id), Some(quantity)) => {
                ledger::release_on(&mut tx, &item_id, quantity).await?;
                DeleteSaleOutcome {
                    inventory_restored: true,
                    restored_quantity: Some(quantity),
                    inventory_item_id: Some(item_id),
                }
            }
            _ => DeleteSaleOutcome {
                inventory_restored: false,
                restored_quantity: None,
                inventory_item_id: None,
            },
        };

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            id = %id,
            inventory_restored = outcome.inventory_restored,
            "Sale deleted"
        );

        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
