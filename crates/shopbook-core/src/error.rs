//! # Error Types
//!
//! Domain-specific error types for shopbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  shopbook-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule failures                      │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  shopbook-db errors (separate crate)                                │
//! │  ├── DbError          - Storage failures                            │
//! │  └── ServiceError     - CoreError ∪ DbError for lifecycle/ledger    │
//! │                                                                     │
//! │  apps/server                                                        │
//! │  └── ApiError         - { code, message } JSON with HTTP status     │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Include display context in messages (item name, quantities)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations surfaced by the ledger and the sale lifecycle.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced inventory item does not exist.
    ///
    /// Raised both at sale creation (bad reference in the input) and at sale
    /// deletion (the item was deleted independently after the sale was made).
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    /// The referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// A reservation would drive stock negative.
    ///
    /// Carries the item's display name and both quantities so the caller can
    /// render a complete message without another lookup.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Input failed schema validation before touching storage.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation failures.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (unparseable amount, bad operation name, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
