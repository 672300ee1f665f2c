//! # Expense Repository
//!
//! Database operations for expenses. Expenses are immutable after creation:
//! the only operations are create, read, and delete.

use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shopbook_core::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str =
    "id, date, category, store_vendor, description, amount_cents, created_at";

/// Filter for listing expenses.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Exact calendar-day match.
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring match on description or category.
    pub search: Option<String>,
}

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Creates and persists a new expense, returning the stored record.
    pub async fn create(&self, input: &NewExpense) -> DbResult<Expense> {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            date: input.date,
            category: input.category.trim().to_string(),
            store_vendor: input.store_vendor.trim().to_string(),
            description: input.description.trim().to_string(),
            amount_cents: input.amount_cents,
            created_at: Utc::now(),
        };

        debug!(id = %expense.id, category = %expense.category, "Inserting expense");

        sqlx::query(
            "INSERT INTO expenses (id, date, category, store_vendor, description, amount_cents, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&expense.id)
        .bind(expense.date)
        .bind(&expense.category)
        .bind(&expense.store_vendor)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses, newest first, applying the given filter.
    pub async fn list(&self, filter: &ExpenseFilter) -> DbResult<Vec<Expense>> {
        debug!(?filter, "Listing expenses");

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE 1=1"));

        if let Some(ref category) = filter.category {
            query.push(" AND category = ");
            query.push_bind(category);
        }

        if let Some(date) = filter.date {
            query.push(" AND date = ");
            query.push_bind(date);
        }

        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            query.push(" AND (description LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR category LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY date DESC, created_at DESC");

        let expenses = query
            .build_query_as::<Expense>()
            .fetch_all(&self.pool)
            .await?;

        Ok(expenses)
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }

    /// Counts all expenses (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn expense(date: (i32, u32, u32), category: &str, amount_cents: i64) -> NewExpense {
        NewExpense {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.to_string(),
            store_vendor: "Acme Supply".to_string(),
            description: format!("{category} purchase"),
            amount_cents,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let repo = db.expenses();

        repo.create(&expense((2024, 3, 10), "Supplies", 4000)).await.unwrap();
        repo.create(&expense((2024, 3, 12), "Rent", 90000)).await.unwrap();

        let all = repo.list(&ExpenseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].category, "Rent");

        let supplies = ExpenseFilter {
            category: Some("Supplies".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&supplies).await.unwrap().len(), 1);

        let search = ExpenseFilter {
            search: Some("rent".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&search).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.expenses();

        let created = repo.create(&expense((2024, 3, 10), "Supplies", 4000)).await.unwrap();
        repo.delete(&created.id).await.unwrap();

        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
