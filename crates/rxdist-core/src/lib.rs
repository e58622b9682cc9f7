//! # rxdist-core: Pure Business Logic for rxdist
//!
//! Scheme evaluation, inventory valuation and pricing for a pharmaceutical
//! distributor. Every function here is pure: it takes an immutable snapshot
//! of records and returns owned results.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          rxdist Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rxdist-cli (binary)                          │   │
//! │  │   evaluate ─ order ─ valuate ─ report ─ price                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              rxdist-store (snapshot + config)                   │   │
//! │  │     JSON snapshot loading, rxdist.toml, lookups                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &[Scheme], &[InventoryBatch], ...     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxdist-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  scheme   │  │ inventory │  │   rate    │  │    gst    │  │   │
//! │  │   │  engine   │  │  valuer   │  │  masters  │  │   slabs   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`scheme`] - Supplier schemes and the selection engine
//! - [`inventory`] - Batches, expiry risk, stock status, FEFO
//! - [`rate`] - Tiered selling prices from cost
//! - [`gst`] - GST slabs and line amounts
//! - [`ledger`] - Outstanding per supplier
//! - [`types`] - Master and transaction records
//! - [`money`] - Integer paise arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: the evaluation date is an argument, never `today()`
//! 2. **Integer Money**: paise in `i64`, percentages in basis points
//! 3. **Total Functions**: malformed schemes are ineligible, not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rxdist_core::money::Money;
//! use rxdist_core::scheme::{evaluate_scheme, SchemeContext};
//!
//! let as_of = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
//! let ctx = SchemeContext::new("P-DOLO650", 120, Money::from_rupees(3600), as_of);
//!
//! // No schemes, no benefit
//! let decision = evaluate_scheme(&[], &ctx);
//! assert!(decision.is_none());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gst;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod rate;
pub mod scheme;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use gst::GstRate;
pub use inventory::{valuate_inventory, InventoryBatch, InventoryValuation, InventoryValuer};
pub use money::Money;
pub use rate::{selling_price, RateMaster};
pub use scheme::{evaluate_scheme, Scheme, SchemeContext, SchemeDecision};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days before expiry at which a batch becomes "critical".
///
/// Expiry on or before today is "expired"; within this many days after
/// today is "critical". Overridable through `InventoryValuer::new`.
pub const EXPIRY_CRITICAL_DAYS: i64 = 30;
