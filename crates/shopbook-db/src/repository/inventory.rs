//! # Inventory Repository
//!
//! Database operations for inventory items: create, list, full-field update,
//! delete.
//!
//! ## Stock Arithmetic Lives Elsewhere
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  This repository never adds or subtracts stock. Reservations,       │
//! │  releases, and manual adjustments go through crate::ledger, which   │
//! │  enforces current_stock >= 0 and keeps total_value_cents derived.   │
//! │  The full-field update here recomputes total_value_cents itself so  │
//! │  the invariant also survives edits.                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shopbook_core::{InventoryItem, NewInventoryItem};

const ITEM_COLUMNS: &str = "id, name, category, current_stock, min_stock, unit_cost_cents, \
     total_value_cents, stock_date, created_at, updated_at";

/// Filter for listing inventory items.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring match on name or category.
    pub search: Option<String>,
}

/// Repository for inventory item database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Creates and persists a new inventory item, returning the stored record.
    ///
    /// `total_value_cents` is derived here; callers cannot supply it.
    pub async fn create(&self, input: &NewInventoryItem) -> DbResult<InventoryItem> {
        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            current_stock: input.current_stock,
            min_stock: input.min_stock,
            unit_cost_cents: input.unit_cost_cents,
            total_value_cents: stock_value(input.current_stock, input.unit_cost_cents)?,
            stock_date: input.stock_date,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %item.id, name = %item.name, "Inserting inventory item");

        sqlx::query(
            "INSERT INTO inventory_items (id, name, category, current_stock, min_stock, \
             unit_cost_cents, total_value_cents, stock_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.current_stock)
        .bind(item.min_stock)
        .bind(item.unit_cost_cents)
        .bind(item.total_value_cents)
        .bind(item.stock_date)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists inventory items, sorted by name.
    pub async fn list(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        debug!(?filter, "Listing inventory items");

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE 1=1"
        ));

        if let Some(ref category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category);
        }

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            query.push(" AND (name LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR category LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY name ASC");

        let items = query
            .build_query_as::<InventoryItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets an inventory item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Replaces all caller-editable fields of an item, recomputing
    /// `total_value_cents`, and returns the updated record.
    pub async fn update(&self, id: &str, input: &NewInventoryItem) -> DbResult<InventoryItem> {
        debug!(id = %id, "Updating inventory item");

        let now = Utc::now();
        let total_value_cents = stock_value(input.current_stock, input.unit_cost_cents)?;

        let result = sqlx::query(
            "UPDATE inventory_items SET name = ?2, category = ?3, current_stock = ?4, \
             min_stock = ?5, unit_cost_cents = ?6, total_value_cents = ?7, stock_date = ?8, \
             updated_at = ?9 WHERE id = ?1",
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.category.trim())
        .bind(input.current_stock)
        .bind(input.min_stock)
        .bind(input.unit_cost_cents)
        .bind(total_value_cents)
        .bind(input.stock_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        // Re-read so the caller sees the stored record (created_at included).
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Deletes an inventory item.
    ///
    /// Sales referencing the item keep their soft reference; deleting them
    /// later fails their stock restore (see the lifecycle's delete policy).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Counts all inventory items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Derives a stock value, guarding the multiplication.
pub(crate) fn stock_value(current_stock: i64, unit_cost_cents: i64) -> DbResult<i64> {
    current_stock
        .checked_mul(unit_cost_cents)
        .ok_or_else(|| DbError::Internal("stock value overflows i64".to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn widget() -> NewInventoryItem {
        NewInventoryItem {
            name: "Widget".to_string(),
            category: "Hardware".to_string(),
            current_stock: 10,
            min_stock: 2,
            unit_cost_cents: 500,
            stock_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_derives_total_value() {
        let db = test_db().await;
        let item = db.inventory().create(&widget()).await.unwrap();

        assert_eq!(item.total_value_cents, 5000);
        assert_eq!(item.current_stock, 10);

        let stored = db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn test_update_recomputes_total_value() {
        let db = test_db().await;
        let repo = db.inventory();
        let item = repo.create(&widget()).await.unwrap();

        let mut changed = widget();
        changed.current_stock = 4;
        changed.unit_cost_cents = 600;

        let updated = repo.update(&item.id, &changed).await.unwrap();
        assert_eq!(updated.total_value_cents, 2400);
        assert_eq!(updated.created_at, item.created_at);

        assert!(matches!(
            repo.update("missing", &changed).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.create(&widget()).await.unwrap();
        let mut gadget = widget();
        gadget.name = "Gadget".to_string();
        gadget.category = "Electronics".to_string();
        repo.create(&gadget).await.unwrap();

        let all = repo.list(&InventoryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // Sorted by name
        assert_eq!(all[0].name, "Gadget");

        let hardware = InventoryFilter {
            category: Some("Hardware".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&hardware).await.unwrap().len(), 1);

        let search = InventoryFilter {
            search: Some("gad".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&search).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.inventory();
        let item = repo.create(&widget()).await.unwrap();

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&item.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
