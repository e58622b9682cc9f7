//! # Error Types
//!
//! Domain-specific error types for rxdist-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rxdist-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Field-level input problems                     │
//! │                                                                         │
//! │  rxdist-store errors (separate crate)                                  │
//! │  └── StoreError       - Snapshot / config loading failures             │
//! │                                                                         │
//! │  CLI (binary edge)                                                     │
//! │  └── anyhow::Error    - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → anyhow → stderr      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scheme evaluation and inventory valuation never return errors: a
//! malformed scheme is simply not eligible and an unknown product has zero
//! stock. The errors below come from pricing, allocation and validation.

use thiserror::Error;

use crate::types::CustomerTier;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the supplied snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product exists but has been deactivated.
    #[error("Product {0} is inactive")]
    ProductInactive(String),

    /// Not enough sellable (unexpired, positive) stock to fill a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale entry (qty: 50)
    ///      │
    ///      ▼
    /// FEFO allocation: sellable=32
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "P-DOLO", available: 32, requested: 50 }
    ///      │
    ///      ▼
    /// UI shows: "Only 32 units of Dolo 650 in sellable batches"
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// No rate master row for the product and customer tier.
    #[error("No rate master for product {product_id} at tier {tier}")]
    RateMasterMissing {
        product_id: String,
        tier: CustomerTier,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. HSN code, GSTIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A date window ends before it starts.
    #[error("{field} ends before it starts")]
    InvertedWindow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
