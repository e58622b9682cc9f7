//! # Schemes
//!
//! Supplier discount/benefit rules and their evaluation.
//!
//! - [`model`] - `Scheme`, the `SchemeTerms` sum type, slabs and scope
//! - [`engine`] - single-line evaluation (`evaluate_scheme`)
//! - [`order`] - whole-order evaluation (`evaluate_order`)
//!
//! Listing helpers used by dashboards live here.

pub mod engine;
pub mod model;
pub mod order;

use chrono::NaiveDate;

pub use engine::{evaluate_scheme, scheme_benefit, Benefit, CashIncentive, SchemeContext, SchemeDecision};
pub use model::{AmountSlab, ProductScope, QtySlab, Scheme, SchemeKind, SchemeTerms};
pub use order::{evaluate_order, LineDecision, OrderContext, OrderDecision, OrderLine};

/// Schemes that are active and inside their validity window on `as_of`,
/// sorted by id.
pub fn active_schemes(schemes: &[Scheme], as_of: NaiveDate) -> Vec<&Scheme> {
    let mut live: Vec<&Scheme> = schemes
        .iter()
        .filter(|s| s.is_well_formed() && s.is_live_on(as_of))
        .collect();
    live.sort_by(|a, b| a.id.cmp(&b.id));
    live
}

/// Schemes that pass the common eligibility gate for a product on `as_of`,
/// sorted by id. Variant conditions (quantity, slabs, combo) are not checked.
pub fn schemes_for_product<'a>(
    schemes: &'a [Scheme],
    product_id: &str,
    as_of: NaiveDate,
) -> Vec<&'a Scheme> {
    let mut matching: Vec<&Scheme> = schemes
        .iter()
        .filter(|s| s.is_eligible(product_id, as_of))
        .collect();
    matching.sort_by(|a, b| a.id.cmp(&b.id));
    matching
}

/// Schemes owned by one company.
pub fn company_schemes<'a>(schemes: &'a [Scheme], company_id: &str) -> Vec<&'a Scheme> {
    schemes.iter().filter(|s| s.company_id == company_id).collect()
}
