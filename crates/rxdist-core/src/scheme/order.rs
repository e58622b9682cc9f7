//! # Order-Level Evaluation
//!
//! Runs the line engine over a whole purchase order.
//!
//! Each line sees the order's full product id set, which is what makes combo
//! schemes decidable. A combo only benefits the lines whose product is part
//! of the combo, so across the qualifying group the discount adds up to
//! `group amount × combo %` exactly once. Unrelated lines never pick it up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

use super::engine::{evaluate_scheme, SchemeContext, SchemeDecision};
use super::model::Scheme;

/// One line of a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub qty: i64,
    pub amount: Money,
}

/// A purchase order awaiting scheme evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderContext {
    pub lines: Vec<OrderLine>,
    #[ts(as = "String")]
    pub as_of: NaiveDate,
}

impl OrderContext {
    /// Distinct product ids on the order, sorted.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lines.iter().map(|l| l.product_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineDecision {
    pub product_id: String,
    pub qty: i64,
    pub amount: Money,
    pub decision: SchemeDecision,
}

/// Per-line decisions plus order totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDecision {
    pub lines: Vec<LineDecision>,
    pub gross_amount: Money,
    pub total_discount: Money,
    pub net_amount: Money,
    pub total_free_units: i64,
}

/// Evaluates every line of an order, in order.
pub fn evaluate_order(schemes: &[Scheme], order: &OrderContext) -> OrderDecision {
    let product_ids = order.product_ids();

    let lines: Vec<LineDecision> = order
        .lines
        .iter()
        .map(|line| {
            let ctx = SchemeContext::new(line.product_id.clone(), line.qty, line.amount, order.as_of)
                .with_order_products(product_ids.iter().cloned());
            LineDecision {
                product_id: line.product_id.clone(),
                qty: line.qty,
                amount: line.amount,
                decision: evaluate_scheme(schemes, &ctx),
            }
        })
        .collect();

    let gross_amount: Money = lines.iter().map(|l| l.amount).sum();
    let total_discount: Money = lines.iter().map(|l| l.decision.monetary_discount).sum();
    let total_free_units = lines
        .iter()
        .fold(0i64, |acc, l| acc.saturating_add(l.decision.free_units));

    OrderDecision {
        lines,
        gross_amount,
        total_discount,
        net_amount: gross_amount - total_discount,
        total_free_units,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::model::{ProductScope, SchemeKind, SchemeTerms};
    use crate::types::{Percent, RecordStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheme(id: &str, terms: SchemeTerms) -> Scheme {
        Scheme {
            id: id.to_string(),
            company_id: "C-1".to_string(),
            name: String::new(),
            valid_from: date(2026, 1, 1),
            valid_to: date(2026, 12, 31),
            products: ProductScope::All,
            status: RecordStatus::Active,
            terms,
        }
    }

    fn order(lines: &[(&str, i64, i64)]) -> OrderContext {
        OrderContext {
            lines: lines
                .iter()
                .map(|(p, q, rupees)| OrderLine {
                    product_id: p.to_string(),
                    qty: *q,
                    amount: Money::from_rupees(*rupees),
                })
                .collect(),
            as_of: date(2026, 3, 1),
        }
    }

    #[test]
    fn test_combo_applies_once_to_the_group() {
        let schemes = vec![scheme(
            "S-COMBO",
            SchemeTerms::Combo {
                combo_products: vec!["P-AMOX".into(), "P-PARA".into()],
                combo_discount_percent: Percent::from_bps(1000),
            },
        )];
        let decision = evaluate_order(
            &schemes,
            &order(&[("P-AMOX", 10, 600), ("P-PARA", 20, 400), ("P-ORS", 5, 100)]),
        );

        assert_eq!(decision.lines[0].decision.applied_kind, Some(SchemeKind::Combo));
        assert_eq!(decision.lines[1].decision.applied_kind, Some(SchemeKind::Combo));
        assert!(decision.lines[2].decision.is_none());

        // 10% of the ₹1000 group, not of the ₹1100 order
        assert_eq!(decision.total_discount, Money::from_rupees(100));
        assert_eq!(decision.gross_amount, Money::from_rupees(1100));
        assert_eq!(decision.net_amount, Money::from_rupees(1000));
    }

    #[test]
    fn test_incomplete_combo_gives_nothing() {
        let schemes = vec![scheme(
            "S-COMBO",
            SchemeTerms::Combo {
                combo_products: vec!["P-AMOX".into(), "P-PARA".into()],
                combo_discount_percent: Percent::from_bps(1000),
            },
        )];
        let decision = evaluate_order(&schemes, &order(&[("P-AMOX", 10, 600)]));
        assert!(decision.total_discount.is_zero());
    }

    #[test]
    fn test_totals_include_free_units() {
        let schemes = vec![scheme(
            "S-FREE",
            SchemeTerms::FreeQty {
                buy_qty: 10,
                free_qty: 1,
            },
        )];
        let decision = evaluate_order(&schemes, &order(&[("P-1", 25, 250), ("P-2", 10, 100)]));
        assert_eq!(decision.total_free_units, 3);
        assert!(decision.total_discount.is_zero());
    }

    #[test]
    fn test_product_ids_are_distinct() {
        let ctx = order(&[("P-2", 1, 1), ("P-1", 1, 1), ("P-2", 1, 1)]);
        assert_eq!(ctx.product_ids(), vec!["P-1".to_string(), "P-2".to_string()]);
    }

    #[test]
    fn test_empty_order() {
        let decision = evaluate_order(&[], &order(&[]));
        assert!(decision.lines.is_empty());
        assert!(decision.gross_amount.is_zero());
    }
}
