//! # Supplier Ledger
//!
//! Outstanding balance per company: invoiced purchases minus payments made.
//! Purchases and payments with a company id missing from the company list
//! still get a balance row, so nothing silently drops out of the total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Payment, Purchase};

/// Purchased, paid and outstanding amounts of one company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBalance {
    pub company_id: String,
    pub purchased: Money,
    pub paid: Money,
    /// `purchased - paid`; negative means the company owes us (advance).
    pub outstanding: Money,
}

/// Balances keyed and sorted by company id.
pub fn company_balances(purchases: &[Purchase], payments: &[Payment]) -> Vec<CompanyBalance> {
    let mut balances: BTreeMap<&str, CompanyBalance> = BTreeMap::new();

    for purchase in purchases {
        let row = balances
            .entry(purchase.company_id.as_str())
            .or_insert_with(|| CompanyBalance {
                company_id: purchase.company_id.clone(),
                ..CompanyBalance::default()
            });
        row.purchased += purchase.total();
    }

    for payment in payments {
        let row = balances
            .entry(payment.company_id.as_str())
            .or_insert_with(|| CompanyBalance {
                company_id: payment.company_id.clone(),
                ..CompanyBalance::default()
            });
        row.paid += payment.amount();
    }

    balances
        .into_values()
        .map(|mut row| {
            row.outstanding = row.purchased - row.paid;
            row
        })
        .collect()
}

/// Outstanding amount per company id.
pub fn company_outstanding(purchases: &[Purchase], payments: &[Payment]) -> BTreeMap<String, Money> {
    company_balances(purchases, payments)
        .into_iter()
        .map(|row| (row.company_id, row.outstanding))
        .collect()
}
