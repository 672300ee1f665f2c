//! # Domain Types
//!
//! Core record types used throughout Shopbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐  ┌───────────────┐  ┌────────────────────┐      │
//! │  │     Sale      │  │    Expense    │  │   InventoryItem    │      │
//! │  │ ───────────── │  │ ───────────── │  │ ────────────────── │      │
//! │  │ id (UUID)     │  │ id (UUID)     │  │ id (UUID)          │      │
//! │  │ date          │  │ date          │  │ name               │      │
//! │  │ quantity      │  │ category      │  │ current_stock      │      │
//! │  │ total_cents   │  │ amount_cents  │  │ total_value_cents  │      │
//! │  │ inventory_*   │  │               │  │ (always stock×cost)│      │
//! │  └───────────────┘  └───────────────┘  └────────────────────┘      │
//! │                                                                     │
//! │  Inputs (NewSale, ...) are what callers send; records are what the  │
//! │  store returns. Outcome structs carry the post-write facts a caller │
//! │  needs, so no client-side cache is required.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales and expenses are immutable once created: the only write after
//! creation is deletion. Inventory items are fully mutable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// When `inventory_item_id` is set the sale was stock-linked at creation and
/// `inventory_quantity` holds the exact number of units reserved. Deletion
/// restores exactly that amount, independent of the item's current stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar day of the sale (no time component).
    pub date: NaiveDate,

    /// Display name of what was sold; independent of any inventory linkage.
    pub item: String,

    /// Units sold.
    pub quantity: i64,

    /// Price per unit in cents.
    pub price_cents: i64,

    /// Sale total in cents (quantity × price unless the caller overrode it).
    pub total_cents: i64,

    /// Soft reference to the inventory item this sale drew from.
    pub inventory_item_id: Option<String>,

    /// Units reserved from inventory at creation time. Frozen: deletion
    /// restores exactly this amount.
    pub inventory_quantity: Option<i64>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this sale reserved inventory at creation.
    #[inline]
    pub fn is_inventory_linked(&self) -> bool {
        self.inventory_item_id.is_some() && self.inventory_quantity.is_some()
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A recorded expense. Immutable after creation; deletable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    /// Free-form label ("Supplies", "Rent", ...).
    pub category: String,
    pub store_vendor: String,
    pub description: String,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Returns the expense amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked inventory item.
///
/// `total_value_cents` is derived and kept equal to
/// `current_stock * unit_cost_cents` after every committed mutation; the
/// ledger and the full-field update both recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Units on hand; never negative.
    pub current_stock: i64,
    /// Reorder threshold.
    pub min_stock: i64,
    /// Cost per unit in cents.
    pub unit_cost_cents: i64,
    /// Derived: current_stock × unit_cost_cents.
    pub total_value_cents: i64,
    /// Day the stock level was last taken.
    pub stock_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the unit cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Returns the total stock value as Money.
    #[inline]
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }

    /// Whether the item has fallen to or below its reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }
}

// =============================================================================
// Stock Operation
// =============================================================================

/// Direction of a standalone stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockOperation {
    /// Increase stock (restock delivery).
    Add,
    /// Decrease stock; rejected if it would drive stock negative.
    Subtract,
}

// =============================================================================
// Operation Inputs
// =============================================================================

/// Input for creating a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub date: NaiveDate,
    pub item: String,
    pub quantity: i64,
    pub price_cents: i64,
    /// Explicit total override; defaults to quantity × price.
    #[serde(default)]
    pub total_cents: Option<i64>,
    /// When set, the sale reserves `quantity` units from this item.
    #[serde(default)]
    pub inventory_item_id: Option<String>,
}

/// Input for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub store_vendor: String,
    pub description: String,
    pub amount_cents: i64,
}

/// Input for creating or replacing an inventory item.
///
/// `total_value_cents` is intentionally absent: it is always derived so the
/// stock-value invariant cannot be broken from the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub category: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub unit_cost_cents: i64,
    pub stock_date: NaiveDate,
}

// =============================================================================
// Operation Outcomes
// =============================================================================

/// Result of a successful `create_sale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleOutcome {
    pub id: String,
    /// Whether an inventory reservation happened as part of the sale.
    pub inventory_updated: bool,
    /// Post-reservation stock level, when inventory was updated.
    pub new_stock: Option<i64>,
}

/// Result of a successful `delete_sale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSaleOutcome {
    /// Whether stock was released back to an inventory item.
    pub inventory_restored: bool,
    pub restored_quantity: Option<i64>,
    pub inventory_item_id: Option<String>,
}

/// Result of a successful standalone stock adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub new_stock: i64,
    pub operation: StockOperation,
    pub quantity: i64,
}

/// Monthly dashboard figures, all in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDashboard {
    pub sales_cents: i64,
    pub expenses_cents: i64,
    /// sales − expenses; negative months are real months.
    pub net_profit_cents: i64,
    pub bank_balance_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> InventoryItem {
        InventoryItem {
            id: "item-1".to_string(),
            name: "Widget".to_string(),
            category: "Hardware".to_string(),
            current_stock: 10,
            min_stock: 2,
            unit_cost_cents: 500,
            total_value_cents: 5000,
            stock_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let mut item = widget();
        assert!(!item.is_low_stock());

        item.current_stock = 2;
        assert!(item.is_low_stock());

        item.current_stock = 0;
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_sale_inventory_linkage() {
        let sale = Sale {
            id: "sale-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            item: "Widget".to_string(),
            quantity: 3,
            price_cents: 700,
            total_cents: 2100,
            inventory_item_id: Some("item-1".to_string()),
            inventory_quantity: Some(3),
            created_at: Utc::now(),
        };
        assert!(sale.is_inventory_linked());
        assert_eq!(sale.total().cents(), 2100);
    }

    #[test]
    fn test_stock_operation_serde_names() {
        assert_eq!(
            serde_json::to_value(StockOperation::Subtract).unwrap(),
            serde_json::json!("subtract")
        );
        let op: StockOperation = serde_json::from_str("\"add\"").unwrap();
        assert_eq!(op, StockOperation::Add);
    }
}
