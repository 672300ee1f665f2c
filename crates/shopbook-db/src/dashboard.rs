//! # Dashboard Aggregator
//!
//! Derives the monthly dashboard figures: sales total, expenses total, net
//! profit, and the stored bank balance. Pure read; the only failure modes
//! are a bad month number and storage being unavailable.
//!
//! The month filter is a half-open date range
//! `[first-of-month, first-of-next-month)` over the ISO date column, which
//! matches exactly the records whose calendar day falls in that month.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{DbError, ServiceResult};
use crate::repository::settings::SettingsRepository;
use shopbook_core::validation::validate_month;
use shopbook_core::{MonthlyDashboard, ValidationError};

/// The dashboard aggregation service.
#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    pool: SqlitePool,
}

impl DashboardAggregator {
    /// Creates a new DashboardAggregator.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardAggregator { pool }
    }

    /// Sums sales and expenses for the given calendar month and combines
    /// them with the stored bank balance (0 if unset or unparseable).
    pub async fn monthly_totals(&self, year: i32, month: u32) -> ServiceResult<MonthlyDashboard> {
        validate_month(month)?;

        let (start, end) = month_bounds(year, month)?;

        let sales_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cents), 0) FROM sales WHERE date >= ?1 AND date < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        let expenses_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses WHERE date >= ?1 AND date < ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        let bank_balance = SettingsRepository::new(self.pool.clone())
            .bank_balance()
            .await?;

        Ok(MonthlyDashboard {
            sales_cents,
            expenses_cents,
            net_profit_cents: sales_cents - expenses_cents,
            bank_balance_cents: bank_balance.cents(),
        })
    }
}

/// Returns the half-open date range covering a calendar month.
fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let out_of_range = || ValidationError::InvalidFormat {
        field: "year".to_string(),
        reason: format!("{year}-{month:02} is not a representable month"),
    };

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(out_of_range)?;

    Ok((start, end))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::pool::{Database, DbConfig};
    use shopbook_core::{CoreError, Money, NewExpense, NewSale};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    async fn seed_sale(db: &Database, date: NaiveDate, total_cents: i64) {
        db.sale_lifecycle()
            .create_sale(NewSale {
                date,
                item: "Widget".to_string(),
                quantity: 1,
                price_cents: total_cents,
                total_cents: Some(total_cents),
                inventory_item_id: None,
            })
            .await
            .unwrap();
    }

    async fn seed_expense(db: &Database, date: NaiveDate, amount_cents: i64) {
        db.expenses()
            .create(&NewExpense {
                date,
                category: "Supplies".to_string(),
                store_vendor: "Acme Supply".to_string(),
                description: "Boxes".to_string(),
                amount_cents,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_march_2024_dashboard() {
        let db = test_db().await;

        seed_sale(&db, day(2024, 3, 5), 10000).await;
        seed_expense(&db, day(2024, 3, 20), 4000).await;
        db.settings()
            .set_bank_balance(Money::from_cents(50000))
            .await
            .unwrap();

        let dashboard = db.dashboard().monthly_totals(2024, 3).await.unwrap();
        assert_eq!(
            dashboard,
            MonthlyDashboard {
                sales_cents: 10000,
                expenses_cents: 4000,
                net_profit_cents: 6000,
                bank_balance_cents: 50000,
            }
        );
    }

    #[tokio::test]
    async fn test_month_boundaries_are_exact() {
        let db = test_db().await;

        seed_sale(&db, day(2024, 2, 29), 100).await; // leap day, previous month
        seed_sale(&db, day(2024, 3, 1), 200).await;
        seed_sale(&db, day(2024, 3, 31), 300).await;
        seed_sale(&db, day(2024, 4, 1), 400).await;

        let march = db.dashboard().monthly_totals(2024, 3).await.unwrap();
        assert_eq!(march.sales_cents, 500);

        let december_sale = day(2023, 12, 31);
        seed_sale(&db, december_sale, 700).await;
        let december = db.dashboard().monthly_totals(2023, 12).await.unwrap();
        assert_eq!(december.sales_cents, 700);
    }

    #[tokio::test]
    async fn test_empty_month_is_all_zero() {
        let db = test_db().await;

        let dashboard = db.dashboard().monthly_totals(2024, 7).await.unwrap();
        assert_eq!(dashboard.sales_cents, 0);
        assert_eq!(dashboard.expenses_cents, 0);
        assert_eq!(dashboard.net_profit_cents, 0);
        assert_eq!(dashboard.bank_balance_cents, 0);
    }

    #[tokio::test]
    async fn test_bad_month_rejected() {
        let db = test_db().await;
        let err = db.dashboard().monthly_totals(2024, 13).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_net_profit() {
        let db = test_db().await;

        seed_sale(&db, day(2024, 3, 5), 1000).await;
        seed_expense(&db, day(2024, 3, 6), 2500).await;

        let dashboard = db.dashboard().monthly_totals(2024, 3).await.unwrap();
        assert_eq!(dashboard.net_profit_cents, -1500);
    }
}
