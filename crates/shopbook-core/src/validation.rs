//! # Validation Module
//!
//! Input schema validation for Shopbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: serde deserialization (types, required JSON fields)       │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - range and emptiness checks, run by the      │
//! │           lifecycle/ledger/repositories before any storage call     │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: SQLite NOT NULL / PRIMARY KEY constraints                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation input gets a `validate_*` function so malformed requests
//! are rejected with a structured error before the store is touched.

use crate::error::ValidationError;
use crate::types::{NewExpense, NewInventoryItem, NewSale};
use crate::{MAX_NAME_LEN, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a free-form name field (item, category, vendor, ...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a sale/adjustment quantity: strictly positive, bounded.
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if quantity > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock level or reorder threshold: zero or greater, bounded.
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if level > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a monetary amount in cents: zero or greater.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a calendar month number (1-12).
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

// =============================================================================
// Operation Input Validators
// =============================================================================

/// Validates the input for `create_sale`.
pub fn validate_new_sale(input: &NewSale) -> ValidationResult<()> {
    validate_name("item", &input.item)?;
    validate_quantity("quantity", input.quantity)?;
    validate_amount_cents("price", input.price_cents)?;
    if let Some(total) = input.total_cents {
        validate_amount_cents("total", total)?;
    }
    if let Some(ref item_id) = input.inventory_item_id {
        validate_name("inventoryItemId", item_id)?;
    }
    Ok(())
}

/// Validates the input for `create_expense`.
pub fn validate_new_expense(input: &NewExpense) -> ValidationResult<()> {
    validate_name("category", &input.category)?;
    validate_name("storeVendor", &input.store_vendor)?;
    validate_name("description", &input.description)?;
    validate_amount_cents("amount", input.amount_cents)?;
    Ok(())
}

/// Validates the input for creating or replacing an inventory item.
pub fn validate_new_inventory_item(input: &NewInventoryItem) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_name("category", &input.category)?;
    validate_stock_level("currentStock", input.current_stock)?;
    validate_stock_level("minStock", input.min_stock)?;
    validate_amount_cents("unitCost", input.unit_cost_cents)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
