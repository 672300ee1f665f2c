//! # Transfer Service
//!
//! CSV export/import per collection and whole-store JSON backup/restore.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CSV (one file per collection, original column headers)             │
//! │                                                                     │
//! │    sales:     date,item,quantity,price,total                        │
//! │    expenses:  date,category,storeVendor,description,amount          │
//! │    inventory: name,category,currentStock,minStock,unitCost,         │
//! │               totalValue                                            │
//! │                                                                     │
//! │    Money columns are decimal strings ("7.00"); dates are ISO days.  │
//! │    Import APPENDS rows with fresh ids, all in one transaction.      │
//! │                                                                     │
//! │  JSON backup                                                        │
//! │    { sales, expenses, inventory, bankBalanceCents }                 │
//! │    Restore REPLACES all four collections wholesale, in one          │
//! │    transaction, preserving the backed-up ids.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A malformed row fails the whole import; nothing is partially applied.
//! Imported sales carry no inventory linkage, so a later delete of an
//! imported sale never touches stock.

use chrono::{NaiveDate, Utc};
use csv::{ReaderBuilder, Trim, Writer};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, ServiceError, ServiceResult};
use crate::repository::expense::ExpenseFilter;
use crate::repository::inventory::{stock_value, InventoryFilter};
use crate::repository::sale::SaleFilter;
use crate::repository::settings::SettingsRepository;
use crate::repository::{ExpenseRepository, InventoryRepository, SaleRepository};
use shopbook_core::validation::{
    validate_new_expense, validate_new_inventory_item, validate_new_sale,
};
use shopbook_core::{
    CoreError, Expense, InventoryItem, Money, NewExpense, NewInventoryItem, NewSale, Sale,
    ValidationError,
};

// =============================================================================
// Payload Shapes
// =============================================================================

/// Whole-store backup payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub inventory: Vec<InventoryItem>,
    pub bank_balance_cents: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaleCsvRow {
    date: NaiveDate,
    item: String,
    quantity: i64,
    price: String,
    /// Empty on import means "derive from quantity × price".
    total: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ExpenseCsvRow {
    date: NaiveDate,
    category: String,
    #[serde(rename = "storeVendor")]
    store_vendor: String,
    description: String,
    amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct InventoryCsvRow {
    name: String,
    category: String,
    #[serde(rename = "currentStock")]
    current_stock: i64,
    #[serde(rename = "minStock")]
    min_stock: i64,
    #[serde(rename = "unitCost")]
    unit_cost: String,
    /// Exported for spreadsheet use; ignored on import (always re-derived).
    #[serde(rename = "totalValue")]
    total_value: String,
}

// =============================================================================
// Service
// =============================================================================

/// The CSV/JSON transfer service.
#[derive(Debug, Clone)]
pub struct TransferService {
    pool: SqlitePool,
}

impl TransferService {
    /// Creates a new TransferService.
    pub fn new(pool: SqlitePool) -> Self {
        TransferService { pool }
    }

    // -------------------------------------------------------------------------
    // CSV export
    // -------------------------------------------------------------------------

    /// Exports all sales as CSV.
    pub async fn export_sales_csv(&self) -> ServiceResult<String> {
        let sales = SaleRepository::new(self.pool.clone())
            .list(&SaleFilter::default())
            .await?;

        let mut writer = Writer::from_writer(Vec::new());
        for sale in &sales {
            writer
                .serialize(SaleCsvRow {
                    date: sale.date,
                    item: sale.item.clone(),
                    quantity: sale.quantity,
                    price: sale.price().to_string(),
                    total: sale.total().to_string(),
                })
                .map_err(csv_invalid)?;
        }

        finish_csv(writer)
    }

    /// Exports all expenses as CSV.
    pub async fn export_expenses_csv(&self) -> ServiceResult<String> {
        let expenses = ExpenseRepository::new(self.pool.clone())
            .list(&ExpenseFilter::default())
            .await?;

        let mut writer = Writer::from_writer(Vec::new());
        for expense in &expenses {
            writer
                .serialize(ExpenseCsvRow {
                    date: expense.date,
                    category: expense.category.clone(),
                    store_vendor: expense.store_vendor.clone(),
                    description: expense.description.clone(),
                    amount: expense.amount().to_string(),
                })
                .map_err(csv_invalid)?;
        }

        finish_csv(writer)
    }

    /// Exports all inventory items as CSV.
    pub async fn export_inventory_csv(&self) -> ServiceResult<String> {
        let items = InventoryRepository::new(self.pool.clone())
            .list(&InventoryFilter::default())
            .await?;

        let mut writer = Writer::from_writer(Vec::new());
        for item in &items {
            writer
                .serialize(InventoryCsvRow {
                    name: item.name.clone(),
                    category: item.category.clone(),
                    current_stock: item.current_stock,
                    min_stock: item.min_stock,
                    unit_cost: item.unit_cost().to_string(),
                    total_value: item.total_value().to_string(),
                })
                .map_err(csv_invalid)?;
        }

        finish_csv(writer)
    }

    // -------------------------------------------------------------------------
    // CSV import
    // -------------------------------------------------------------------------

    /// Imports sales from CSV text, appending rows. Returns the row count.
    pub async fn import_sales_csv(&self, text: &str) -> ServiceResult<usize> {
        let mut sales = Vec::new();
        let now = Utc::now();

        for row in read_csv::<SaleCsvRow>(text)? {
            let price = parse_money("price", &row.price)?;
            let total = match row.total.trim() {
                "" => price
                    .checked_mul_quantity(row.quantity)
                    .ok_or_else(|| overflow("total"))?,
                text => parse_money("total", text)?,
            };

            let input = NewSale {
                date: row.date,
                item: row.item,
                quantity: row.quantity,
                price_cents: price.cents(),
                total_cents: Some(total.cents()),
                inventory_item_id: None,
            };
            validate_new_sale(&input).map_err(CoreError::from)?;

            sales.push(Sale {
                id: Uuid::new_v4().to_string(),
                date: input.date,
                item: input.item.trim().to_string(),
                quantity: input.quantity,
                price_cents: input.price_cents,
                total_cents: total.cents(),
                inventory_item_id: None,
                inventory_quantity: None,
                created_at: now,
            });
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        for sale in &sales {
            insert_sale_row(&mut tx, sale).await?;
        }
        tx.commit().await.map_err(DbError::from)?;

        info!(count = sales.len(), "Imported sales from CSV");
        Ok(sales.len())
    }

    /// Imports expenses from CSV text, appending rows. Returns the row count.
    pub async fn import_expenses_csv(&self, text: &str) -> ServiceResult<usize> {
        let mut expenses = Vec::new();
        let now = Utc::now();

        for row in read_csv::<ExpenseCsvRow>(text)? {
            let amount = parse_money("amount", &row.amount)?;

            let input = NewExpense {
                date: row.date,
                category: row.category,
                store_vendor: row.store_vendor,
                description: row.description,
                amount_cents: amount.cents(),
            };
            validate_new_expense(&input).map_err(CoreError::from)?;

            expenses.push(Expense {
                id: Uuid::new_v4().to_string(),
                date: input.date,
                category: input.category.trim().to_string(),
                store_vendor: input.store_vendor.trim().to_string(),
                description: input.description.trim().to_string(),
                amount_cents: input.amount_cents,
                created_at: now,
            });
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        for expense in &expenses {
            insert_expense_row(&mut tx, expense).await?;
        }
        tx.commit().await.map_err(DbError::from)?;

        info!(count = expenses.len(), "Imported expenses from CSV");
        Ok(expenses.len())
    }

    /// Imports inventory items from CSV text, appending rows. Returns the
    /// row count. `totalValue` is re-derived, never trusted.
    pub async fn import_inventory_csv(&self, text: &str) -> ServiceResult<usize> {
        let mut items = Vec::new();
        let now = Utc::now();

        for row in read_csv::<InventoryCsvRow>(text)? {
            let unit_cost = parse_money("unitCost", &row.unit_cost)?;

            let input = NewInventoryItem {
                name: row.name,
                category: row.category,
                current_stock: row.current_stock,
                min_stock: row.min_stock,
                unit_cost_cents: unit_cost.cents(),
                // Imported stock counts date from the import itself.
                stock_date: now.date_naive(),
            };
            validate_new_inventory_item(&input).map_err(CoreError::from)?;

            items.push(InventoryItem {
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
            });
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;
        for item in &items {
            insert_item_row(&mut tx, item).await?;
        }
        tx.commit().await.map_err(DbError::from)?;

        info!(count = items.len(), "Imported inventory from CSV");
        Ok(items.len())
    }

    // -------------------------------------------------------------------------
    // JSON backup
    // -------------------------------------------------------------------------

    /// Exports the whole store as a backup payload.
    pub async fn export_backup(&self) -> ServiceResult<BackupPayload> {
        let sales = SaleRepository::new(self.pool.clone())
            .list(&SaleFilter::default())
            .await?;
        let expenses = ExpenseRepository::new(self.pool.clone())
            .list(&ExpenseFilter::default())
            .await?;
        let inventory = InventoryRepository::new(self.pool.clone())
            .list(&InventoryFilter::default())
            .await?;
        let bank_balance = SettingsRepository::new(self.pool.clone())
            .bank_balance()
            .await?;

        Ok(BackupPayload {
            sales,
            expenses,
            inventory,
            bank_balance_cents: bank_balance.cents(),
        })
    }

    /// Restores a backup, replacing all collections and the bank balance.
    pub async fn import_backup(&self, backup: &BackupPayload) -> ServiceResult<()> {
        debug!(
            sales = backup.sales.len(),
            expenses = backup.expenses.len(),
            inventory = backup.inventory.len(),
            "Restoring backup"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        for table in ["sales", "expenses", "inventory_items"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;
        }

        for sale in &backup.sales {
            insert_sale_row(&mut tx, sale).await?;
        }
        for expense in &backup.expenses {
            insert_expense_row(&mut tx, expense).await?;
        }
        for item in &backup.inventory {
            insert_item_row(&mut tx, item).await?;
        }

        let balance = Money::from_cents(backup.bank_balance_cents).to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
             updated_at = excluded.updated_at",
        )
        .bind(shopbook_core::BANK_BALANCE_KEY)
        .bind(balance)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!("Backup restored");
        Ok(())
    }
}

// =============================================================================
// Row Insert Helpers (shared by CSV import and backup restore)
// =============================================================================

async fn insert_sale_row(conn: &mut SqliteConnection, sale: &Sale) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO sales (id, date, item, quantity, price_cents, total_cents, \
         inventory_item_id, inventory_quantity, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&sale.id)
    .bind(sale.date)
    .bind(&sale.item)
    .bind(sale.quantity)
    .bind(sale.price_cents)
    .bind(sale.total_cents)
    .bind(&sale.inventory_item_id)
    .bind(sale.inventory_quantity)
    .bind(sale.created_at)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

async fn insert_expense_row(conn: &mut SqliteConnection, expense: &Expense) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO expenses (id, date, category, store_vendor, description, \
         amount_cents, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&expense.id)
    .bind(expense.date)
    .bind(&expense.category)
    .bind(&expense.store_vendor)
    .bind(&expense.description)
    .bind(expense.amount_cents)
    .bind(expense.created_at)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

async fn insert_item_row(conn: &mut SqliteConnection, item: &InventoryItem) -> ServiceResult<()> {
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
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

// =============================================================================
// CSV Helpers
// =============================================================================

fn read_csv<T: for<'de> Deserialize<'de>>(text: &str) -> ServiceResult<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for row in reader.deserialize::<T>() {
        rows.push(row.map_err(csv_invalid)?);
    }
    Ok(rows)
}

fn finish_csv(writer: Writer<Vec<u8>>) -> ServiceResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DbError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DbError::Internal(e.to_string()).into())
}

fn parse_money(field: &str, text: &str) -> ServiceResult<Money> {
    text.parse::<Money>().map_err(|e| {
        ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }))
    })
}

fn overflow(field: &str) -> ServiceError {
    ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "value overflows".to_string(),
    }))
}

fn csv_invalid(err: csv::Error) -> ServiceError {
    ServiceError::Core(CoreError::Validation(ValidationError::InvalidFormat {
        field: "csv".to_string(),
        reason: err.to_string(),
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================
