//! # Scheme Engine
//!
//! Picks the most favorable benefit for one purchase line.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       evaluate_scheme()                                 │
//! │                                                                         │
//! │  schemes ──► eligible? (well-formed, active, in window, in scope)      │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │         variant benefit                                                 │
//! │     ┌───────────┼─────────────────────┬──────────────────┐             │
//! │     ▼           ▼                     ▼                  ▼             │
//! │  freeQty     monetary              cash             no benefit         │
//! │  (units)  slab/volume/combo/     (incentive,        (slab miss,        │
//! │     │     seasonal/trade/disc.   never netted)      qty too low)       │
//! │     │           │                     │                                 │
//! │     ▼           ▼                     ▼                                 │
//! │  most units  greatest ₹, then     best %, then                         │
//! │  then id     precedence, then id  days, then id                        │
//! │     └───────────┴──────────┬──────────┘                                 │
//! │                            ▼                                            │
//! │                     SchemeDecision                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every comparison ends on the scheme id, so the result never depends on
//! the order of the input slice.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Percent;

use super::model::{Scheme, SchemeKind, SchemeTerms};

// =============================================================================
// Inputs
// =============================================================================

/// One candidate purchase line plus the order it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SchemeContext {
    pub product_id: String,
    pub qty: i64,
    /// Line amount before any scheme discount.
    pub amount: Money,
    /// Every product id on the order. Required for combo schemes.
    #[serde(default)]
    pub order_product_ids: Option<Vec<String>>,
    #[ts(as = "String")]
    pub as_of: NaiveDate,
}

impl SchemeContext {
    pub fn new(product_id: impl Into<String>, qty: i64, amount: Money, as_of: NaiveDate) -> Self {
        SchemeContext {
            product_id: product_id.into(),
            qty,
            amount,
            order_product_ids: None,
            as_of,
        }
    }

    /// Attaches the order's product id set.
    pub fn with_order_products<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_product_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    fn order_contains(&self, product_id: &str) -> bool {
        self.order_product_ids
            .as_ref()
            .map(|ids| ids.iter().any(|id| id == product_id))
            .unwrap_or(false)
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Early-payment incentive reported alongside the line decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashIncentive {
    pub scheme_id: String,
    pub percent: Percent,
    pub payment_days: u32,
    /// What the incentive is worth on this line if paid in time.
    pub value: Money,
}

/// Outcome of evaluating schemes against one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SchemeDecision {
    /// Scheme that produced `monetary_discount`.
    pub applied_scheme_id: Option<String>,
    pub applied_kind: Option<SchemeKind>,
    pub monetary_discount: Money,
    pub free_units: i64,
    pub free_units_scheme_id: Option<String>,
    pub cash_incentive: Option<CashIncentive>,
}

impl SchemeDecision {
    /// The "no scheme applies" decision.
    pub fn none() -> Self {
        SchemeDecision {
            applied_scheme_id: None,
            applied_kind: None,
            monetary_discount: Money::zero(),
            free_units: 0,
            free_units_scheme_id: None,
            cash_incentive: None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.applied_scheme_id.is_none()
            && self.free_units_scheme_id.is_none()
            && self.cash_incentive.is_none()
    }

    /// Line amount after the monetary discount.
    pub fn net_amount(&self, amount: Money) -> Money {
        amount - self.monetary_discount
    }
}

impl Default for SchemeDecision {
    fn default() -> Self {
        SchemeDecision::none()
    }
}

// =============================================================================
// Benefit Computation
// =============================================================================

/// What one eligible scheme offers on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Benefit {
    Monetary(Money),
    FreeUnits(i64),
    Cash { percent: Percent, payment_days: u32 },
}

/// Benefit of a single scheme on a line, or `None` if it does not qualify.
///
/// Includes the common gate (well-formed, live, in scope) so callers can use
/// it on unfiltered scheme lists.
pub fn scheme_benefit(scheme: &Scheme, ctx: &SchemeContext) -> Option<Benefit> {
    if !scheme.is_eligible(&ctx.product_id, ctx.as_of) {
        return None;
    }

    match &scheme.terms {
        SchemeTerms::FreeQty { buy_qty, free_qty } => {
            if ctx.qty < *buy_qty {
                return None;
            }
            // buy_qty > 0 is guaranteed by is_well_formed, and qty >= buy_qty,
            // so integer division is floor division here.
            Some(Benefit::FreeUnits((ctx.qty / buy_qty).saturating_mul(*free_qty)))
        }
        SchemeTerms::Discount {
            discount_percent,
            min_purchase_qty,
        } => {
            if ctx.qty < min_purchase_qty.unwrap_or(0) {
                return None;
            }
            Some(Benefit::Monetary(ctx.amount.percent_of(*discount_percent)))
        }
        SchemeTerms::Slab { slabs } => slabs
            .iter()
            .find(|slab| slab.contains(ctx.qty))
            .map(|slab| Benefit::Monetary(ctx.amount.percent_of(slab.discount))),
        SchemeTerms::Cash {
            cash_discount_percent,
            payment_days,
        } => Some(Benefit::Cash {
            percent: *cash_discount_percent,
            payment_days: *payment_days,
        }),
        SchemeTerms::Volume { volume_slabs } => volume_slabs
            .iter()
            .find(|slab| slab.contains(ctx.amount))
            .map(|slab| Benefit::Monetary(ctx.amount.percent_of(slab.discount))),
        SchemeTerms::Trade {
            trade_discount_percent,
        } => Some(Benefit::Monetary(ctx.amount.percent_of(*trade_discount_percent))),
        SchemeTerms::Seasonal {
            seasonal_discount_percent,
            ..
        } => Some(Benefit::Monetary(
            ctx.amount.percent_of(*seasonal_discount_percent),
        )),
        SchemeTerms::Combo {
            combo_products,
            combo_discount_percent,
        } => {
            // The line must itself be part of the combo, and the whole combo
            // must be on the order.
            // The line is always on its own order.
            let in_combo = combo_products.iter().any(|p| *p == ctx.product_id);
            let complete = combo_products
                .iter()
                .all(|p| *p == ctx.product_id || ctx.order_contains(p));
            if in_combo && complete {
                Some(Benefit::Monetary(ctx.amount.percent_of(*combo_discount_percent)))
            } else {
                None
            }
        }
    }
}

// =============================================================================
// Selection
// =============================================================================

struct Candidate<'a> {
    scheme: &'a Scheme,
    kind: SchemeKind,
    value: Money,
}

/// Greater is better: benefit, then variant precedence, then smaller id.
fn compare_monetary(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.value
        .cmp(&b.value)
        .then_with(|| a.kind.precedence().cmp(&b.kind.precedence()))
        .then_with(|| b.scheme.id.cmp(&a.scheme.id))
}

/// Evaluates all schemes against a line and returns the best decision.
///
/// ## Rules
/// - Among monetary schemes the strictly greatest benefit wins; ties go to
///   `slab > volume > combo > seasonal > trade > discount`, then to the
///   smallest scheme id.
/// - The best `freeQty` and best `cash` scheme are reported alongside and
///   never compared against money.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rxdist_core::money::Money;
/// use rxdist_core::scheme::{evaluate_scheme, SchemeContext};
///
/// let today = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// let ctx = SchemeContext::new("P-1", 15, Money::from_rupees(1500), today);
/// let decision = evaluate_scheme(&[], &ctx);
/// assert!(decision.is_none());
/// assert!(decision.monetary_discount.is_zero());
/// ```
pub fn evaluate_scheme(schemes: &[Scheme], ctx: &SchemeContext) -> SchemeDecision {
    let mut best_monetary: Option<Candidate<'_>> = None;
    let mut best_free: Option<(&Scheme, i64)> = None;
    let mut best_cash: Option<(&Scheme, Percent, u32)> = None;

    for scheme in schemes {
        let Some(benefit) = scheme_benefit(scheme, ctx) else {
            continue;
        };

        match benefit {
            Benefit::Monetary(value) => {
                let candidate = Candidate {
                    scheme,
                    kind: scheme.kind(),
                    value,
                };
                let replace = match &best_monetary {
                    None => true,
                    Some(current) => compare_monetary(&candidate, current) == Ordering::Greater,
                };
                if replace {
                    best_monetary = Some(candidate);
                }
            }
            Benefit::FreeUnits(units) => {
                let replace = match best_free {
                    None => true,
                    Some((current, current_units)) => units
                        .cmp(&current_units)
                        .then_with(|| current.id.cmp(&scheme.id))
                        == Ordering::Greater,
                };
                if replace {
                    best_free = Some((scheme, units));
                }
            }
            Benefit::Cash {
                percent,
                payment_days,
            } => {
                let replace = match best_cash {
                    None => true,
                    Some((current, current_pct, current_days)) => percent
                        .cmp(&current_pct)
                        .then_with(|| payment_days.cmp(&current_days))
                        .then_with(|| current.id.cmp(&scheme.id))
                        == Ordering::Greater,
                };
                if replace {
                    best_cash = Some((scheme, percent, payment_days));
                }
            }
        }
    }

    let mut decision = SchemeDecision::none();

    if let Some(candidate) = best_monetary {
        decision.applied_scheme_id = Some(candidate.scheme.id.clone());
        decision.applied_kind = Some(candidate.kind);
        decision.monetary_discount = candidate.value;
    }

    if let Some((scheme, units)) = best_free {
        decision.free_units = units;
        decision.free_units_scheme_id = Some(scheme.id.clone());
    }

    if let Some((scheme, percent, payment_days)) = best_cash {
        decision.cash_incentive = Some(CashIncentive {
            scheme_id: scheme.id.clone(),
            percent,
            payment_days,
            value: ctx.amount.percent_of(percent),
        });
    }

    decision
}

// =============================================================================
// Unit Tests
// =============================================================================
