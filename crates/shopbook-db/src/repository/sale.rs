//! # Sale Repository
//!
//! Read-side database operations for sales.
//!
//! ## Why No Writes Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Sales are immutable once created and a write may touch TWO         │
//! │  collections (the sale row + the linked inventory item's stock).    │
//! │  Both writes must share one transaction, so they live in            │
//! │  crate::lifecycle::SaleLifecycle. This repository only reads.       │
//! │  Bulk writes for CSV/JSON import live in crate::transfer.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use shopbook_core::Sale;

const SALE_COLUMNS: &str = "id, date, item, quantity, price_cents, total_cents, \
     inventory_item_id, inventory_quantity, created_at";

/// Filter for listing sales.
///
/// `limit: None` returns the full list (the original UI's `limit=all`).
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Exact calendar-day match.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring match on the item name.
    pub search: Option<String>,
    /// 1-based page; only meaningful together with `limit`.
    pub page: Option<u32>,
    /// Page size; `None` disables pagination.
    pub limit: Option<u32>,
}

/// Repository for sale database reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists sales, newest first, applying the given filter.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(?filter, "Listing sales");

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SALE_COLUMNS} FROM sales WHERE 1=1"));

        if let Some(date) = filter.date {
            query.push(" AND date = ");
            query.push_bind(date);
        }

        if let Some(ref search) = filter.search {
            query.push(" AND item LIKE ");
            query.push_bind(format!("%{}%", search));
        }

        query.push(" ORDER BY date DESC, created_at DESC");

        if let Some(limit) = filter.limit {
            let page = filter.page.unwrap_or(1).max(1);
            let offset = (page - 1) as i64 * limit as i64;
            query.push(" LIMIT ");
            query.push_bind(limit as i64);
            query.push(" OFFSET ");
            query.push_bind(offset);
        }

        let sales = query
            .build_query_as::<Sale>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Counts all sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shopbook_core::NewSale;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale(date: (i32, u32, u32), item: &str, quantity: i64, price_cents: i64) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            item: item.to_string(),
            quantity,
            price_cents,
            total_cents: None,
            inventory_item_id: None,
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_date_and_search() {
        let db = test_db().await;
        let lifecycle = db.sale_lifecycle();

        lifecycle.create_sale(sale((2024, 3, 1), "Widget", 1, 700)).await.unwrap();
        lifecycle.create_sale(sale((2024, 3, 1), "Gadget", 2, 500)).await.unwrap();
        lifecycle.create_sale(sale((2024, 4, 2), "Widget", 3, 700)).await.unwrap();

        let march_first = SaleFilter {
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert_eq!(db.sales().list(&march_first).await.unwrap().len(), 2);

        let widgets = SaleFilter {
            search: Some("Widg".to_string()),
            ..Default::default()
        };
        assert_eq!(db.sales().list(&widgets).await.unwrap().len(), 2);

        assert_eq!(db.sales().list(&SaleFilter::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_pagination() {
        let db = test_db().await;
        let lifecycle = db.sale_lifecycle();

        for day in 1..=5 {
            lifecycle.create_sale(sale((2024, 3, day), "Widget", 1, 100)).await.unwrap();
        }

        let page1 = SaleFilter {
            limit: Some(2),
            page: Some(1),
            ..Default::default()
        };
        let first = db.sales().list(&page1).await.unwrap();
        assert_eq!(first.len(), 2);
        // Newest first
        assert_eq!(first[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let page3 = SaleFilter {
            limit: Some(2),
            page: Some(3),
            ..Default::default()
        };
        assert_eq!(db.sales().list(&page3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_roundtrip() {
        let db = test_db().await;
        let outcome = db
            .sale_lifecycle()
            .create_sale(sale((2024, 3, 15), "Widget", 3, 700))
            .await
            .unwrap();

        let fetched = db.sales().get_by_id(&outcome.id).await.unwrap().unwrap();
        assert_eq!(fetched.item, "Widget");
        assert_eq!(fetched.total_cents, 2100);
        assert!(db.sales().get_by_id("missing").await.unwrap().is_none());
    }
}
