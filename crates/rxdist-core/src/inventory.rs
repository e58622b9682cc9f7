//! # Inventory Valuation
//!
//! Aggregates received batches into stock status, expiry risk and value.
//!
//! ## Batch Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Expiry Risk by Days Left                            │
//! │                                                                         │
//! │   days = expiry - today                                                 │
//! │                                                                         │
//! │   ... -1   0 │ 1   2  ...  29  30 │ 31  32 ...                         │
//! │   ───────────┼────────────────────┼──────────                          │
//! │    EXPIRED   │      CRITICAL      │   FINE                              │
//! │  (incl. today)   (window, default 30 days)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consumption Order (FEFO)
//! Batches of a product must be drawn oldest-expiry first, then oldest
//! purchase date. [`fefo_order`] and [`plan_fefo_consumption`] encode that
//! order; they never decrement anything. Applying a plan to stored batches
//! is the caller's job.
//!
//! Nothing here mutates or merges batches. A batch with `qty <= 0` stays a
//! batch; it just counts as zero.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::EXPIRY_CRITICAL_DAYS;

// =============================================================================
// Batch
// =============================================================================

/// One received lot of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBatch {
    /// Unique across the snapshot.
    pub id: String,
    pub product_id: String,
    /// Supplier / brand the lot came from.
    #[serde(default)]
    pub company_id: Option<String>,
    /// Manufacturer batch number printed on the pack.
    #[serde(default)]
    pub batch_no: String,
    pub qty: i64,
    pub purchase_date: NaiveDate,
    pub expiry: NaiveDate,
    /// Cost rate per unit.
    pub rate_paise: i64,
}

impl InventoryBatch {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_paise(self.rate_paise)
    }

    /// Quantity that counts toward stock: negative balances count as zero.
    #[inline]
    pub fn countable_qty(&self) -> i64 {
        self.qty.max(0)
    }

    /// `countable_qty × rate`.
    #[inline]
    pub fn value(&self) -> Money {
        self.rate().multiply_quantity(self.countable_qty())
    }
}

// =============================================================================
// Status Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Ok,
    Low,
}

/// Strict less-than: on-hand equal to the minimum is still `Ok`.
pub fn stock_status(on_hand: i64, min_stock: i64) -> StockStatus {
    if on_hand < min_stock {
        StockStatus::Low
    } else {
        StockStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryRisk {
    Expired,
    Critical,
    Fine,
}

/// Result of [`valuate_inventory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    pub on_hand: i64,
    pub status: StockStatus,
    /// `qty × rate` over the critical batches.
    pub expiring_value: Money,
    /// Risk bucket keyed by batch id. Batch ids are unique within a
    /// snapshot; a repeated id keeps the risk of its last batch.
    pub batch_risks: BTreeMap<String, ExpiryRisk>,
}

/// Stock position of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub on_hand: i64,
    pub min_stock: i64,
    pub status: StockStatus,
}

// =============================================================================
// Valuer
// =============================================================================

/// Valuation rules with a configurable critical window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryValuer {
    critical_window_days: i64,
}

impl Default for InventoryValuer {
    fn default() -> Self {
        InventoryValuer {
            critical_window_days: EXPIRY_CRITICAL_DAYS,
        }
    }
}

impl InventoryValuer {
    pub fn new(critical_window_days: i64) -> Self {
        InventoryValuer {
            critical_window_days,
        }
    }

    pub fn critical_window_days(&self) -> i64 {
        self.critical_window_days
    }

    /// Expiry bucket of one batch. Quantity plays no part.
    pub fn risk(&self, batch: &InventoryBatch, today: NaiveDate) -> ExpiryRisk {
        let days_left = batch.expiry.signed_duration_since(today).num_days();
        if days_left <= 0 {
            ExpiryRisk::Expired
        } else if days_left <= self.critical_window_days {
            ExpiryRisk::Critical
        } else {
            ExpiryRisk::Fine
        }
    }

    /// Values a product's batches against its minimum stock.
    ///
    /// The caller passes the batches of one product; `on_hand` and `status`
    /// are computed over the whole slice.
    pub fn valuate(
        &self,
        batches: &[InventoryBatch],
        min_stock: i64,
        today: NaiveDate,
    ) -> InventoryValuation {
        let on_hand = countable_total(batches.iter());

        let batch_risks: BTreeMap<String, ExpiryRisk> = batches
            .iter()
            .map(|b| (b.id.clone(), self.risk(b, today)))
            .collect();

        InventoryValuation {
            on_hand,
            status: stock_status(on_hand, min_stock),
            expiring_value: self.expiring_value(batches, today),
            batch_risks,
        }
    }

    /// Sum of `qty × rate` over critical batches, for any mix of products.
    pub fn expiring_value(&self, batches: &[InventoryBatch], today: NaiveDate) -> Money {
        batches
            .iter()
            .filter(|b| self.risk(b, today) == ExpiryRisk::Critical)
            .map(InventoryBatch::value)
            .sum()
    }

    /// Critical batches in FEFO order (the "expiring soon" list).
    pub fn expiring_batches<'a>(
        &self,
        batches: &'a [InventoryBatch],
        today: NaiveDate,
    ) -> Vec<&'a InventoryBatch> {
        let mut soon: Vec<&InventoryBatch> = batches
            .iter()
            .filter(|b| self.risk(b, today) == ExpiryRisk::Critical)
            .collect();
        soon.sort_by(|a, b| fefo_cmp(a, b));
        soon
    }

    /// Per-product stock rows plus portfolio figures.
    ///
    /// Rows cover active products only, sorted by product id. Batches of
    /// unknown products still count toward the portfolio figures.
    pub fn report(
        &self,
        products: &[Product],
        batches: &[InventoryBatch],
        today: NaiveDate,
    ) -> InventoryReport {
        let mut active: Vec<&Product> = products.iter().filter(|p| p.is_active()).collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));

        let rows: Vec<ProductStockRow> = active
            .iter()
            .map(|product| {
                let own: Vec<InventoryBatch> = batches
                    .iter()
                    .filter(|b| b.product_id == product.id)
                    .cloned()
                    .collect();
                let valuation = self.valuate(&own, product.min_stock, today);
                let nearest_expiry = own
                    .iter()
                    .filter(|b| b.countable_qty() > 0)
                    .map(|b| b.expiry)
                    .min();

                ProductStockRow {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    on_hand: valuation.on_hand,
                    min_stock: product.min_stock,
                    status: valuation.status,
                    batch_count: own.len(),
                    nearest_expiry,
                    stock_value: stock_value(&own),
                    expiring_value: valuation.expiring_value,
                }
            })
            .collect();

        let low_stock = rows
            .iter()
            .filter(|r| r.status == StockStatus::Low)
            .map(|r| r.product_id.clone())
            .collect();

        let mut expired_batches = Vec::new();
        let mut critical_batches = Vec::new();
        for batch in fefo_order(batches) {
            match self.risk(batch, today) {
                ExpiryRisk::Expired => expired_batches.push(batch.id.clone()),
                ExpiryRisk::Critical => critical_batches.push(batch.id.clone()),
                ExpiryRisk::Fine => {}
            }
        }

        InventoryReport {
            as_of: today,
            rows,
            low_stock,
            expired_batches,
            critical_batches,
            total_stock_value: stock_value(batches),
            expiring_value: self.expiring_value(batches, today),
        }
    }
}

/// Row of the stock dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockRow {
    pub product_id: String,
    pub name: String,
    pub on_hand: i64,
    pub min_stock: i64,
    pub status: StockStatus,
    pub batch_count: usize,
    /// Earliest expiry among batches that still hold stock.
    #[ts(as = "Option<String>")]
    pub nearest_expiry: Option<NaiveDate>,
    pub stock_value: Money,
    pub expiring_value: Money,
}

/// Output of [`InventoryValuer::report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    #[ts(as = "String")]
    pub as_of: NaiveDate,
    pub rows: Vec<ProductStockRow>,
    /// Product ids below their minimum stock.
    pub low_stock: Vec<String>,
    /// Batch ids, FEFO order.
    pub expired_batches: Vec<String>,
    /// Batch ids, FEFO order.
    pub critical_batches: Vec<String>,
    pub total_stock_value: Money,
    pub expiring_value: Money,
}

// =============================================================================
// Free Functions
// =============================================================================

/// Values a product's batches with the default 30-day critical window.
///
/// ```rust
/// use chrono::NaiveDate;
/// use rxdist_core::inventory::{valuate_inventory, StockStatus};
///
/// let today = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// let valuation = valuate_inventory(&[], 10, today);
/// assert_eq!(valuation.on_hand, 0);
/// assert_eq!(valuation.status, StockStatus::Low);
/// ```
pub fn valuate_inventory(
    batches: &[InventoryBatch],
    min_stock: i64,
    today: NaiveDate,
) -> InventoryValuation {
    InventoryValuer::default().valuate(batches, min_stock, today)
}

fn countable_total<'a>(batches: impl Iterator<Item = &'a InventoryBatch>) -> i64 {
    batches.fold(0i64, |acc, b| acc.saturating_add(b.countable_qty()))
}

/// Stock level of one product picked out of the full batch collection.
///
/// An unknown product has zero on hand and is `Low` iff `min_stock > 0`.
pub fn stock_level(batches: &[InventoryBatch], product_id: &str, min_stock: i64) -> StockLevel {
    let on_hand = countable_total(batches.iter().filter(|b| b.product_id == product_id));
    StockLevel {
        product_id: product_id.to_string(),
        on_hand,
        min_stock,
        status: stock_status(on_hand, min_stock),
    }
}

/// Portfolio-wide value of critical batches, default window.
pub fn portfolio_expiring_value(batches: &[InventoryBatch], today: NaiveDate) -> Money {
    InventoryValuer::default().expiring_value(batches, today)
}

/// Inventory value at cost.
pub fn stock_value(batches: &[InventoryBatch]) -> Money {
    batches.iter().map(InventoryBatch::value).sum()
}

/// Expiry, then purchase date, then batch id.
fn fefo_cmp(a: &InventoryBatch, b: &InventoryBatch) -> Ordering {
    a.expiry
        .cmp(&b.expiry)
        .then_with(|| a.purchase_date.cmp(&b.purchase_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Batches in first-expire-first-out order.
pub fn fefo_order(batches: &[InventoryBatch]) -> Vec<&InventoryBatch> {
    let mut ordered: Vec<&InventoryBatch> = batches.iter().collect();
    ordered.sort_by(|a, b| fefo_cmp(a, b));
    ordered
}

// =============================================================================
// FEFO Consumption Plan
// =============================================================================

/// Units to draw from one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub batch_id: String,
    pub batch_no: String,
    pub qty: i64,
    #[ts(as = "String")]
    pub expiry: NaiveDate,
    pub rate: Money,
}

/// Read-only answer to "which batches would a sale of `requested` use?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionPlan {
    pub product_id: String,
    pub requested: i64,
    pub allocations: Vec<Allocation>,
    pub allocated: i64,
    /// Units that sellable stock could not cover.
    pub shortfall: i64,
}

impl ConsumptionPlan {
    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    /// Cost of the allocated units.
    pub fn cost(&self) -> Money {
        self.allocations
            .iter()
            .map(|a| a.rate.multiply_quantity(a.qty))
            .sum()
    }
}

/// Plans a FEFO draw of `qty` units of a product.
///
/// Only sellable batches take part: positive quantity and `expiry > today`.
/// A non-positive request yields an empty, complete plan.
pub fn plan_fefo_consumption(
    batches: &[InventoryBatch],
    product_id: &str,
    qty: i64,
    today: NaiveDate,
) -> ConsumptionPlan {
    let requested = qty.max(0);
    let mut sellable: Vec<&InventoryBatch> = batches
        .iter()
        .filter(|b| b.product_id == product_id && b.qty > 0 && b.expiry > today)
        .collect();
    sellable.sort_by(|a, b| fefo_cmp(a, b));

    let mut remaining = requested;
    let mut allocations = Vec::new();
    for batch in sellable {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(batch.qty);
        allocations.push(Allocation {
            batch_id: batch.id.clone(),
            batch_no: batch.batch_no.clone(),
            qty: take,
            expiry: batch.expiry,
            rate: batch.rate(),
        });
        remaining -= take;
    }

    ConsumptionPlan {
        product_id: product_id.to_string(),
        requested,
        allocations,
        allocated: requested - remaining,
        shortfall: remaining,
    }
}

/// Like [`plan_fefo_consumption`] but fails when stock falls short.
pub fn allocate_fefo(
    batches: &[InventoryBatch],
    product_id: &str,
    qty: i64,
    today: NaiveDate,
) -> CoreResult<ConsumptionPlan> {
    let plan = plan_fefo_consumption(batches, product_id, qty, today);
    if !plan.is_complete() {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available: plan.allocated,
            requested: plan.requested,
        });
    }
    Ok(plan)
}

// =============================================================================
// Unit Tests
// =============================================================================
