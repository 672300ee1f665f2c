//! # shopbook-core: Pure Business Logic for Shopbook
//!
//! This crate is the heart of the bookkeeping system. It contains the record
//! types, the integer [`Money`] type, input validation, and domain errors,
//! all as pure data and pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Shopbook Architecture                         │
//! │                                                                     │
//! │  REST client ──► apps/server (axum handlers, DTO mapping)           │
//! │                        │                                            │
//! │                        ▼                                            │
//! │  ★ shopbook-core (THIS CRATE) ★                                     │
//! │    types • money • validation • error                               │
//! │    NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS               │
//! │                        │                                            │
//! │                        ▼                                            │
//! │  shopbook-db (SQLite: repositories, ledger, sale lifecycle)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: all monetary values are cents (i64), never floats
//! 2. **Explicit Errors**: all errors are typed enums, never strings or panics
//! 3. **Validate at the boundary**: inputs are checked here before any
//!    storage call sees them

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Settings key under which the bank balance is stored.
///
/// The value is a decimal string (e.g. "500.00") so that the settings table
/// stays a plain string-to-string map.
pub const BANK_BALANCE_KEY: &str = "bankBalance";

/// Maximum quantity accepted on a single sale or stock adjustment.
///
/// Guards against typos (e.g. 1000000 instead of 100) and keeps
/// `quantity * price_cents` far away from i64 overflow.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Maximum length for free-form name fields (item, category, vendor, ...).
pub const MAX_NAME_LEN: usize = 200;
